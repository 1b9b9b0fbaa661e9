use models::{Record, RecordId, RecordKind};
use thiserror::Error;

use crate::pagination::Pagination;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} identity {id} already exists")]
    DuplicateIdentity { kind: RecordKind, id: RecordId },
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: RecordId },
}

/// Read-only, restartable iteration over a store in insertion order.
pub type Scan<'a, R> = std::slice::Iter<'a, R>;

/// Ordered, identity-indexed container of one record kind.
///
/// Identities come from a monotonic counter: `next_id` only ever grows, so an
/// identity freed by `delete` is never handed out again. The store does not
/// validate; callers hand it changes that already passed validation.
#[derive(Debug, Clone)]
pub struct CollectionStore<R: Record> {
    records: Vec<R>,
    next_id: RecordId,
}

impl<R: Record> Default for CollectionStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> CollectionStore<R> {
    pub fn new() -> Self {
        Self { records: Vec::new(), next_id: 1 }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identity the next created record will receive.
    pub fn next_id(&self) -> RecordId {
        self.next_id
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    fn not_found(id: RecordId) -> StoreError {
        StoreError::NotFound { kind: R::KIND, id }
    }

    /// Append a record, advancing the identity counter past its id.
    pub fn insert(&mut self, record: R) -> Result<&R, StoreError> {
        let id = record.id();
        if self.position(id).is_some() {
            return Err(StoreError::DuplicateIdentity { kind: R::KIND, id });
        }
        self.next_id = self.next_id.max(id.saturating_add(1));
        self.records.push(record);
        let idx = self.records.len() - 1;
        Ok(&self.records[idx])
    }

    pub fn get(&self, id: RecordId) -> Result<&R, StoreError> {
        self.records.iter().find(|r| r.id() == id).ok_or_else(|| Self::not_found(id))
    }

    /// Records in `[offset, offset + limit)`, clamped to the store bounds.
    pub fn list(&self, offset: usize, limit: usize) -> &[R] {
        &self.records[Pagination::new(offset, limit).window(self.records.len())]
    }

    /// Apply validated `changes` in place; fields absent from them keep their values.
    pub fn update(&mut self, id: RecordId, changes: R::Changes) -> Result<&R, StoreError> {
        let idx = self.position(id).ok_or_else(|| Self::not_found(id))?;
        self.records[idx].apply_patch(changes);
        Ok(&self.records[idx])
    }

    pub fn delete(&mut self, id: RecordId) -> Result<R, StoreError> {
        let idx = self.position(id).ok_or_else(|| Self::not_found(id))?;
        Ok(self.records.remove(idx))
    }

    pub fn scan(&self) -> Scan<'_, R> {
        self.records.iter()
    }
}
