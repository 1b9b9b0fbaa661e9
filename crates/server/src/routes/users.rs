use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::{NewUser, RecordId, User, UserField, UserPatch};
use serde::Deserialize;
use service::{Deleted, Pagination, SearchCriteria, SearchOutcome};
use tracing::info;

use super::TotalCount;
use crate::{errors::JsonApiError, state::AppState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserSearchQuery {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[utoipa::path(
    post, path = "/users", tag = "users",
    request_body = crate::openapi::NewUserDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn create(State(state): State<AppState>, Json(input): Json<NewUser>) -> Result<(StatusCode, Json<User>), JsonApiError> {
    let user = state.registry.users.create(input)?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get, path = "/users", tag = "users",
    params(crate::openapi::PaginationParams),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(State(state): State<AppState>, Query(page): Query<Pagination>) -> (TotalCount, Json<Vec<User>>) {
    let page = state.registry.users.list(page);
    info!(count = page.items.len(), total = page.total, "list users");
    (TotalCount(page.total), Json(page.items))
}

#[utoipa::path(
    get, path = "/users/{id}", tag = "users",
    params(("id" = u64, Path, description = "User id")),
    responses((status = 200, description = "Found"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<RecordId>) -> Result<Json<User>, JsonApiError> {
    Ok(Json(state.registry.users.read(id)?))
}

#[utoipa::path(
    put, path = "/users/{id}", tag = "users",
    params(("id" = u64, Path, description = "User id")),
    request_body = crate::openapi::UserPatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, JsonApiError> {
    Ok(Json(state.registry.users.update(id, patch)?))
}

#[utoipa::path(
    delete, path = "/users/{id}", tag = "users",
    params(("id" = u64, Path, description = "User id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<RecordId>) -> Result<Json<Deleted<User>>, JsonApiError> {
    Ok(Json(state.registry.users.delete(id)?))
}

#[utoipa::path(
    get, path = "/search/users", tag = "search",
    params(UserSearchQuery),
    responses((status = 200, description = "Search OK"))
)]
pub async fn search(
    State(state): State<AppState>,
    Query(q): Query<UserSearchQuery>,
) -> Result<Json<SearchOutcome<User>>, JsonApiError> {
    let mut criteria = SearchCriteria::new();
    if let Some(name) = q.name {
        criteria = criteria.contains(UserField::Name, name);
    }
    if let Some(email) = q.email {
        criteria = criteria.contains(UserField::Email, email);
    }
    Ok(Json(state.registry.users.search(criteria)?))
}
