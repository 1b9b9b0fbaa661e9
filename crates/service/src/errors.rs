use models::{ModelError, RecordId, RecordKind};
use thiserror::Error;

use crate::storage::collection_store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error on `{field}`: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: RecordId },
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(kind: RecordKind, id: RecordId) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Stable error-kind name surfaced to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "ValidationError",
            Self::Conflict(_) => "ConflictError",
            Self::NotFound { .. } => "NotFoundError",
            Self::InvalidQuery(_) => "InvalidQueryError",
            Self::Db(_) => "DatabaseError",
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation { field, reason } => Self::Validation { field, reason },
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { kind, id } => Self::NotFound { kind, id },
            StoreError::DuplicateIdentity { kind, id } => {
                Self::Conflict(format!("{kind} identity {id} already exists"))
            }
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Db(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_keep_their_field() {
        let err: ServiceError = ModelError::invalid("email", "must contain '@'").into();
        assert!(matches!(err, ServiceError::Validation { field: "email", .. }));
        assert_eq!(err.kind(), "ValidationError");
    }

    #[test]
    fn not_found_message_names_kind_and_id() {
        let err = ServiceError::not_found(RecordKind::User, 7);
        assert_eq!(err.to_string(), "user 7 not found");
        assert_eq!(err.kind(), "NotFoundError");
    }
}
