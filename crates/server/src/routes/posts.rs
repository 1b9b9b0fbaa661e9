use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::{NewPost, Post, PostField, PostPatch, RecordId};
use serde::Deserialize;
use service::{Deleted, Pagination, SearchCriteria};

use super::TotalCount;
use crate::{errors::JsonApiError, state::AppState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostListQuery {
    #[serde(default)]
    pub published_only: bool,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[utoipa::path(
    post, path = "/posts", tag = "posts",
    request_body = crate::openapi::NewPostDoc,
    responses((status = 201, description = "Created"), (status = 422, description = "Validation Error"))
)]
pub async fn create(State(state): State<AppState>, Json(input): Json<NewPost>) -> Result<(StatusCode, Json<Post>), JsonApiError> {
    let post = state.registry.posts.create(input)?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[utoipa::path(
    get, path = "/posts", tag = "posts",
    params(PostListQuery),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<PostListQuery>,
) -> Result<(TotalCount, Json<Vec<Post>>), JsonApiError> {
    let page = Pagination::optional(q.skip, q.limit);
    if q.published_only {
        let mut criteria = SearchCriteria::new().equals(PostField::Published, true);
        if let Some(page) = page {
            criteria = criteria.paginate(page);
        }
        let found = state.registry.posts.search(criteria)?;
        return Ok((TotalCount(found.total), Json(found.results)));
    }
    let listed = state.registry.posts.list(page.unwrap_or(Pagination::new(0, usize::MAX)));
    Ok((TotalCount(listed.total), Json(listed.items)))
}

#[utoipa::path(
    get, path = "/posts/{id}", tag = "posts",
    params(("id" = u64, Path, description = "Post id")),
    responses((status = 200, description = "Found"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<RecordId>) -> Result<Json<Post>, JsonApiError> {
    Ok(Json(state.registry.posts.read(id)?))
}

#[utoipa::path(
    put, path = "/posts/{id}", tag = "posts",
    params(("id" = u64, Path, description = "Post id")),
    request_body = crate::openapi::PostPatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(patch): Json<PostPatch>,
) -> Result<Json<Post>, JsonApiError> {
    Ok(Json(state.registry.posts.update(id, patch)?))
}

#[utoipa::path(
    delete, path = "/posts/{id}", tag = "posts",
    params(("id" = u64, Path, description = "Post id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<RecordId>) -> Result<Json<Deleted<Post>>, JsonApiError> {
    Ok(Json(state.registry.posts.delete(id)?))
}
