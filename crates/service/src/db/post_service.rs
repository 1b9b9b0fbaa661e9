use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use tracing::{info, instrument};

use models::entity::post;
use models::{NewPost, Post};

use crate::errors::ServiceError;
use crate::pagination::Pagination;

#[instrument(skip(db, input), fields(title = %input.title))]
pub async fn create_post(db: &DatabaseConnection, input: NewPost) -> Result<Post, ServiceError> {
    input.validate()?;
    let am = post::ActiveModel {
        title: Set(input.title),
        content: Set(input.content),
        author: Set(input.author),
        published: Set(input.published),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    info!(event = "record_created", kind = "post", id = created.id);
    Ok(created.into())
}

/// Posts ordered by id; `None` returns every row.
pub async fn list_posts(
    db: &DatabaseConnection,
    published_only: bool,
    page: Option<Pagination>,
) -> Result<Vec<Post>, ServiceError> {
    let mut query = post::Entity::find();
    if published_only {
        query = query.filter(post::Column::Published.eq(true));
    }
    if let Some(page) = page {
        let (offset, limit) = page.as_sql();
        query = query.offset(offset).limit(limit);
    }
    let rows = query.order_by_asc(post::Column::Id).all(db).await?;
    Ok(rows.into_iter().map(Post::from).collect())
}
