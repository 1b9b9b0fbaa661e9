use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{info, instrument};

use models::entity::user;
use models::{NewUser, Record, RecordId, RecordKind, User, UserPatch};

use super::{like_pattern, to_db_id};
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::resource::Deleted;

/// Whether another user already holds `email` (case-insensitive).
async fn email_taken(db: &DatabaseConnection, email: &str, except: Option<i32>) -> Result<bool, ServiceError> {
    let mut query = user::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(user::Column::Email))).eq(email.to_lowercase()));
    if let Some(id) = except {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

async fn find(db: &DatabaseConnection, id: RecordId) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(to_db_id(RecordKind::User, id)?)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found(RecordKind::User, id))
}

#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn create_user(db: &DatabaseConnection, input: NewUser) -> Result<User, ServiceError> {
    let age = input.validate()?;
    if email_taken(db, &input.email, None).await? {
        return Err(ServiceError::Conflict("email already registered".into()));
    }
    let am = user::ActiveModel {
        name: Set(input.name),
        email: Set(input.email),
        age: Set(i32::try_from(age).map_err(|_| models::ModelError::invalid("age", "is too large"))?),
        is_active: Set(input.is_active),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    info!(event = "record_created", kind = "user", id = created.id);
    Ok(created.into())
}

/// Users ordered by id.
pub async fn list_users(db: &DatabaseConnection, page: Pagination) -> Result<Vec<User>, ServiceError> {
    let (offset, limit) = page.as_sql();
    let rows = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(User::from).collect())
}

pub async fn get_user(db: &DatabaseConnection, id: RecordId) -> Result<User, ServiceError> {
    Ok(find(db, id).await?.into())
}

/// Partial update; a patch that changes nothing returns the stored row.
#[instrument(skip(db, patch))]
pub async fn update_user(db: &DatabaseConnection, id: RecordId, patch: UserPatch) -> Result<User, ServiceError> {
    let changes = User::validate_patch(patch)?;
    let model = find(db, id).await?;
    if let Some(email) = changes.email.as_set() {
        if email_taken(db, email, Some(model.id)).await? {
            return Err(ServiceError::Conflict("email already registered".into()));
        }
    }

    let mut am: user::ActiveModel = model.clone().into();
    if let Some(name) = changes.name.as_set() {
        am.name = Set(name.clone());
    }
    if let Some(email) = changes.email.as_set() {
        am.email = Set(email.clone());
    }
    if let Some(age) = changes.age.as_set() {
        am.age = Set(i32::try_from(*age).map_err(|_| models::ModelError::invalid("age", "is too large"))?);
    }
    if let Some(active) = changes.is_active.as_set() {
        am.is_active = Set(*active);
    }
    if !am.is_changed() {
        return Ok(model.into());
    }
    let updated = am.update(db).await?;
    info!(event = "record_updated", kind = "user", id = updated.id);
    Ok(updated.into())
}

pub async fn delete_user(db: &DatabaseConnection, id: RecordId) -> Result<Deleted<User>, ServiceError> {
    let model = find(db, id).await?;
    user::Entity::delete_by_id(model.id).exec(db).await?;
    info!(event = "record_deleted", kind = "user", id = model.id);
    let record = User::from(model);
    Ok(Deleted { message: format!("User {} deleted successfully", record.name), record })
}

/// Users whose name and email contain the given substrings (both optional, ANDed).
pub async fn search_users(
    db: &DatabaseConnection,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<Vec<User>, ServiceError> {
    let mut query = user::Entity::find();
    if let Some(name) = name {
        query = query.filter(Expr::expr(Func::lower(Expr::col(user::Column::Name))).like(like_pattern(name)));
    }
    if let Some(email) = email {
        query = query.filter(Expr::expr(Func::lower(Expr::col(user::Column::Email))).like(like_pattern(email)));
    }
    let rows = query.order_by_asc(user::Column::Id).all(db).await?;
    Ok(rows.into_iter().map(User::from).collect())
}
