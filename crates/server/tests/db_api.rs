use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::Service;

use server::routes;
use server::state::DbState;

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(routes::build_db_router(DbState { db }, cors()))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

#[tokio::test]
async fn db_user_flow() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, user) =
        call(&app, "POST", "/db/users", Some(json!({"name": "John Doe", "email": "john@example.com", "age": 30}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["id"], 1);

    let (status, body) =
        call(&app, "POST", "/db/users", Some(json!({"name": "J", "email": "john@example.com", "age": 3}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ConflictError");

    let (status, body) = call(&app, "PUT", "/db/users/1", Some(json!({"age": 31}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["age"], 31);

    let (_, list) = call(&app, "GET", "/db/users", None).await?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let (_, hits) = call(&app, "GET", "/db/search/users?name=john", None).await?;
    assert_eq!(hits.as_array().map(Vec::len), Some(1));

    let (status, body) = call(&app, "DELETE", "/db/users/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User John Doe deleted successfully");

    let (status, _) = call(&app, "GET", "/db/users/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn db_items_posts_and_stats() -> anyhow::Result<()> {
    let app = build_app().await?;
    call(&app, "POST", "/db/items", Some(json!({"name": "Laptop", "description": "fast", "price": 999.99}))).await?;
    call(&app, "POST", "/db/items", Some(json!({"name": "Mug", "description": "cup", "price": 12.99}))).await?;
    call(&app, "POST", "/db/posts", Some(json!({"title": "Hi", "content": "c", "author": "a", "published": true})))
        .await?;

    let (status, item) = call(&app, "GET", "/db/items/2", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["name"], "Mug");

    let (_, hits) = call(&app, "GET", "/db/search/items?max_price=100", None).await?;
    assert_eq!(hits.as_array().map(Vec::len), Some(1));

    let (status, body) = call(&app, "GET", "/db/search/items?min_price=5&max_price=1", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidQueryError");

    let (_, posts) = call(&app, "GET", "/db/posts?published_only=true", None).await?;
    assert_eq!(posts.as_array().map(Vec::len), Some(1));

    let (_, stats) = call(&app, "GET", "/db/stats", None).await?;
    assert_eq!(stats["total_items"], 2);
    assert_eq!(stats["published_posts"], 1);
    assert_eq!(stats["total_users"], 0);
    Ok(())
}

#[tokio::test]
async fn db_post_listing_without_paging_returns_all() -> anyhow::Result<()> {
    let app = build_app().await?;
    for n in 0..12 {
        let post = json!({"title": format!("Post {n}"), "content": "c", "author": "a"});
        let (status, _) = call(&app, "POST", "/db/posts", Some(post)).await?;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (_, posts) = call(&app, "GET", "/db/posts", None).await?;
    assert_eq!(posts.as_array().map(Vec::len), Some(12));
    let (_, posts) = call(&app, "GET", "/db/posts?skip=3&limit=4", None).await?;
    assert_eq!(posts.as_array().map(Vec::len), Some(4));
    assert_eq!(posts[0]["title"], "Post 3");
    Ok(())
}
