//! Handlers of the database-backed server, mounted under `/db`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::{Item, NewItem, NewPost, NewUser, Post, RecordId, User, UserPatch};
use serde::Deserialize;
use service::db::{item_service, post_service, stats_service, user_service};
use service::{Deleted, Pagination, StatsReport};
use tracing::info;

use crate::{errors::JsonApiError, state::DbState};

#[derive(Debug, Deserialize)]
pub struct DbPostQuery {
    #[serde(default)]
    pub published_only: bool,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DbUserSearch {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DbItemSearch {
    pub q: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

pub async fn create_user(State(state): State<DbState>, Json(input): Json<NewUser>) -> Result<(StatusCode, Json<User>), JsonApiError> {
    let user = user_service::create_user(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(State(state): State<DbState>, Query(page): Query<Pagination>) -> Result<Json<Vec<User>>, JsonApiError> {
    let users = user_service::list_users(&state.db, page).await?;
    info!(count = users.len(), "list db users");
    Ok(Json(users))
}

pub async fn get_user(State(state): State<DbState>, Path(id): Path<RecordId>) -> Result<Json<User>, JsonApiError> {
    Ok(Json(user_service::get_user(&state.db, id).await?))
}

pub async fn update_user(
    State(state): State<DbState>,
    Path(id): Path<RecordId>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, JsonApiError> {
    Ok(Json(user_service::update_user(&state.db, id, patch).await?))
}

pub async fn delete_user(State(state): State<DbState>, Path(id): Path<RecordId>) -> Result<Json<Deleted<User>>, JsonApiError> {
    Ok(Json(user_service::delete_user(&state.db, id).await?))
}

pub async fn create_item(State(state): State<DbState>, Json(input): Json<NewItem>) -> Result<(StatusCode, Json<Item>), JsonApiError> {
    let item = item_service::create_item(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list_items(State(state): State<DbState>, Query(page): Query<Pagination>) -> Result<Json<Vec<Item>>, JsonApiError> {
    Ok(Json(item_service::list_items(&state.db, page).await?))
}

pub async fn get_item(State(state): State<DbState>, Path(id): Path<RecordId>) -> Result<Json<Item>, JsonApiError> {
    Ok(Json(item_service::get_item(&state.db, id).await?))
}

pub async fn create_post(State(state): State<DbState>, Json(input): Json<NewPost>) -> Result<(StatusCode, Json<Post>), JsonApiError> {
    let post = post_service::create_post(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list_posts(State(state): State<DbState>, Query(q): Query<DbPostQuery>) -> Result<Json<Vec<Post>>, JsonApiError> {
    let page = Pagination::optional(q.skip, q.limit);
    Ok(Json(post_service::list_posts(&state.db, q.published_only, page).await?))
}

pub async fn search_users(State(state): State<DbState>, Query(q): Query<DbUserSearch>) -> Result<Json<Vec<User>>, JsonApiError> {
    Ok(Json(user_service::search_users(&state.db, q.name.as_deref(), q.email.as_deref()).await?))
}

pub async fn search_items(State(state): State<DbState>, Query(q): Query<DbItemSearch>) -> Result<Json<Vec<Item>>, JsonApiError> {
    let items = item_service::search_items(&state.db, q.q.as_deref(), q.min_price, q.max_price).await?;
    Ok(Json(items))
}

pub async fn stats(State(state): State<DbState>) -> Result<Json<StatsReport>, JsonApiError> {
    let snapshot = stats_service::collect_stats(&state.db).await?;
    Ok(Json(StatsReport::from(&snapshot)))
}
