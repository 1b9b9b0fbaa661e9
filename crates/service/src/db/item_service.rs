use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use tracing::{debug, info, instrument};

use models::entity::item;
use models::{Item, NewItem, RecordId, RecordKind};

use super::{like_pattern, to_db_id};
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::query::check_bounds;

/// Tags are not persisted by the relational schema.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_item(db: &DatabaseConnection, input: NewItem) -> Result<Item, ServiceError> {
    input.validate()?;
    if !input.tags.is_empty() {
        debug!(event = "tags_dropped", count = input.tags.len());
    }
    let am = item::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        price: Set(input.price),
        tax: Set(input.tax),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    info!(event = "record_created", kind = "item", id = created.id);
    Ok(created.into())
}

pub async fn list_items(db: &DatabaseConnection, page: Pagination) -> Result<Vec<Item>, ServiceError> {
    let (offset, limit) = page.as_sql();
    let rows = item::Entity::find()
        .order_by_asc(item::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Item::from).collect())
}

pub async fn get_item(db: &DatabaseConnection, id: RecordId) -> Result<Item, ServiceError> {
    item::Entity::find_by_id(to_db_id(RecordKind::Item, id)?)
        .one(db)
        .await?
        .map(Item::from)
        .ok_or_else(|| ServiceError::not_found(RecordKind::Item, id))
}

/// Items whose name or description contains `q`, within the inclusive price bounds.
#[instrument(skip(db))]
pub async fn search_items(
    db: &DatabaseConnection,
    q: Option<&str>,
    min_price: Option<f64>,
    max_price: Option<f64>,
) -> Result<Vec<Item>, ServiceError> {
    check_bounds("price", min_price, max_price)?;
    let mut query = item::Entity::find();
    if let Some(q) = q {
        let pattern = like_pattern(q);
        query = query.filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(item::Column::Name))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(item::Column::Description))).like(pattern)),
        );
    }
    if let Some(min) = min_price {
        query = query.filter(item::Column::Price.gte(min));
    }
    if let Some(max) = max_price {
        query = query.filter(item::Column::Price.lte(max));
    }
    let rows = query.order_by_asc(item::Column::Id).all(db).await?;
    Ok(rows.into_iter().map(Item::from).collect())
}
