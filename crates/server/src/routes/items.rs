use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::{Item, ItemField, ItemPatch, NewItem, RecordId};
use serde::Deserialize;
use service::{Deleted, Pagination, SearchCriteria};

use super::TotalCount;
use crate::{errors::JsonApiError, state::AppState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemListQuery {
    /// Case-insensitive substring of the item name.
    pub q: Option<String>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[utoipa::path(
    post, path = "/items", tag = "items",
    request_body = crate::openapi::NewItemDoc,
    responses((status = 201, description = "Created"), (status = 422, description = "Validation Error"))
)]
pub async fn create(State(state): State<AppState>, Json(input): Json<NewItem>) -> Result<(StatusCode, Json<Item>), JsonApiError> {
    let item = state.registry.items.create(input)?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get, path = "/items", tag = "items",
    params(ItemListQuery),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<ItemListQuery>,
) -> Result<(TotalCount, Json<Vec<Item>>), JsonApiError> {
    let page = Pagination::from_parts(q.skip, q.limit);
    match q.q {
        Some(needle) => {
            let criteria = SearchCriteria::new().contains(ItemField::Name, needle).paginate(page);
            let found = state.registry.items.search(criteria)?;
            Ok((TotalCount(found.total), Json(found.results)))
        }
        None => {
            let listed = state.registry.items.list(page);
            Ok((TotalCount(listed.total), Json(listed.items)))
        }
    }
}

#[utoipa::path(
    get, path = "/items/{id}", tag = "items",
    params(("id" = u64, Path, description = "Item id")),
    responses((status = 200, description = "Found"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<RecordId>) -> Result<Json<Item>, JsonApiError> {
    Ok(Json(state.registry.items.read(id)?))
}

#[utoipa::path(
    put, path = "/items/{id}", tag = "items",
    params(("id" = u64, Path, description = "Item id")),
    request_body = crate::openapi::ItemPatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(patch): Json<ItemPatch>,
) -> Result<Json<Item>, JsonApiError> {
    Ok(Json(state.registry.items.update(id, patch)?))
}

#[utoipa::path(
    delete, path = "/items/{id}", tag = "items",
    params(("id" = u64, Path, description = "Item id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<RecordId>) -> Result<Json<Deleted<Item>>, JsonApiError> {
    Ok(Json(state.registry.items.delete(id)?))
}
