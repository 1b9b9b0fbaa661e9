//! The record operations expressed against the relational store.
//!
//! Same inputs, patches, validation and error taxonomy as the in-memory
//! services; isolation comes from the database.

pub mod user_service;
pub mod item_service;
pub mod post_service;
pub mod stats_service;

use models::{RecordId, RecordKind};
use sea_orm::sea_query::LikeExpr;

use crate::errors::ServiceError;

/// Identities past the primary-key range cannot exist, so they are not found.
pub(crate) fn to_db_id(kind: RecordKind, id: RecordId) -> Result<i32, ServiceError> {
    i32::try_from(id).map_err(|_| ServiceError::not_found(kind, id))
}

/// `LIKE` pattern for a lowercase substring match; `%` and `_` in the needle match literally.
pub(crate) fn like_pattern(needle: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

