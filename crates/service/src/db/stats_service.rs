use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::instrument;

use models::entity::{item, post, user};
use models::RecordKind;

use crate::errors::ServiceError;
use crate::stats::{KindStats, StatsSnapshot};

/// Per-kind counts computed with `COUNT` queries.
#[instrument(skip(db))]
pub async fn collect_stats(db: &DatabaseConnection) -> Result<StatsSnapshot, ServiceError> {
    let users = user::Entity::find().count(db).await?;
    let active = user::Entity::find().filter(user::Column::IsActive.eq(true)).count(db).await?;
    let items = item::Entity::find().count(db).await?;
    let posts = post::Entity::find().count(db).await?;
    let published = post::Entity::find().filter(post::Column::Published.eq(true)).count(db).await?;

    Ok(StatsSnapshot::new(vec![
        KindStats { kind: RecordKind::User, total: users as usize, flagged: Some(active as usize) },
        KindStats { kind: RecordKind::Item, total: items as usize, flagged: None },
        KindStats { kind: RecordKind::Post, total: posts as usize, flagged: Some(published as usize) },
    ]))
}
