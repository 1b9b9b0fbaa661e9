use axum::{
    http::{HeaderName, HeaderValue},
    middleware,
    response::{IntoResponseParts, ResponseParts},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::{Health, Message};

use crate::openapi::ApiDoc;
use crate::state::{AppState, DbState};

pub mod auth;
pub mod db;
pub mod items;
pub mod posts;
pub mod search;
pub mod stats;
pub mod users;

/// Sets the `x-total-count` header to the size of the unpaginated collection.
pub struct TotalCount(pub usize);

impl IntoResponseParts for TotalCount {
    type Error = std::convert::Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.headers_mut().insert(HeaderName::from_static("x-total-count"), HeaderValue::from(self.0));
        Ok(res)
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Healthy")))]
pub async fn health() -> Json<Health> {
    Json(Health::healthy())
}

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Welcome")))]
pub async fn root() -> Json<Message> {
    Json(Message::new("Welcome to the CRUD hub API"))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Router of the in-memory server.
pub fn build_memory_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/login", post(auth::login))
        .route("/stats", get(stats::stats));

    let resources = Router::new()
        .route("/users", post(users::create).get(users::list))
        .route("/users/:id", get(users::get).put(users::update).delete(users::delete))
        .route("/items", post(items::create).get(items::list))
        .route("/items/:id", get(items::get).put(items::update).delete(items::delete))
        .route("/posts", post(posts::create).get(posts::list))
        .route("/posts/:id", get(posts::get).put(posts::update).delete(posts::delete))
        .route("/search", get(search::search_items))
        .route("/search/users", get(users::search));

    let protected = Router::new()
        .route("/protected", get(auth::protected))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token));

    let app = public.merge(resources).merge(protected).with_state(state);
    with_http_layers(app, cors)
}

/// Router of the database-backed server.
pub fn build_db_router(state: DbState, cors: CorsLayer) -> Router {
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/db/users", post(db::create_user).get(db::list_users))
        .route("/db/users/:id", get(db::get_user).put(db::update_user).delete(db::delete_user))
        .route("/db/items", post(db::create_item).get(db::list_items))
        .route("/db/items/:id", get(db::get_item))
        .route("/db/posts", post(db::create_post).get(db::list_posts))
        .route("/db/search/users", get(db::search_users))
        .route("/db/search/items", get(db::search_items))
        .route("/db/stats", get(db::stats))
        .with_state(state);
    with_http_layers(app, cors)
}

fn with_http_layers(app: Router, cors: CorsLayer) -> Router {
    app.layer(cors).layer(
        TraceLayer::new_for_http()
            // one span per request, method and path included
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            // status and latency
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            // 5xx
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
