//! Generic per-kind facade over a [`CollectionStore`].
//!
//! Every mutation runs under the write lock: validate, check uniqueness, then
//! touch the store. A failure at any step leaves the store as it was.

use chrono::Utc;
use models::{FieldValue, Record, RecordField, RecordId};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::query::{self, SearchCriteria};
use crate::stats::{KindStats, StatsSource};
use crate::storage::collection_store::CollectionStore;

/// One page of a listing plus the size of the whole collection.
#[derive(Clone, Debug, Serialize)]
pub struct Page<R> {
    pub items: Vec<R>,
    pub skip: usize,
    pub limit: usize,
    pub total: usize,
}

/// Confirmation returned by a delete.
#[derive(Clone, Debug, Serialize)]
pub struct Deleted<R> {
    pub message: String,
    pub record: R,
}

#[derive(Clone, Debug, Serialize)]
#[serde(bound = "")]
pub struct SearchOutcome<R: Record> {
    pub results: Vec<R>,
    pub total: usize,
    pub criteria: SearchCriteria<R::Field>,
}

#[derive(Debug)]
pub struct ResourceService<R: Record> {
    store: RwLock<CollectionStore<R>>,
}

impl<R: Record> Default for ResourceService<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> ResourceService<R> {
    pub fn new() -> Self {
        Self { store: RwLock::new(CollectionStore::new()) }
    }

    pub fn create(&self, input: R::Input) -> Result<R, ServiceError> {
        let mut store = self.store.write();
        let record = R::from_input(store.next_id(), input, Utc::now())?;
        ensure_unique(&store, &record, None)?;
        let stored = store.insert(record)?.clone();
        info!(event = "record_created", kind = %R::KIND, id = stored.id());
        Ok(stored)
    }

    pub fn read(&self, id: RecordId) -> Result<R, ServiceError> {
        Ok(self.store.read().get(id)?.clone())
    }

    pub fn list(&self, page: Pagination) -> Page<R> {
        let store = self.store.read();
        Page {
            items: store.list(page.skip, page.limit).to_vec(),
            skip: page.skip,
            limit: page.limit,
            total: store.len(),
        }
    }

    pub fn update(&self, id: RecordId, patch: R::Patch) -> Result<R, ServiceError> {
        let changes = R::validate_patch(patch)?;
        let mut store = self.store.write();
        let mut candidate = store.get(id)?.clone();
        candidate.apply_patch(changes.clone());
        ensure_unique(&store, &candidate, Some(id))?;
        let updated = store.update(id, changes)?.clone();
        info!(event = "record_updated", kind = %R::KIND, id);
        Ok(updated)
    }

    pub fn delete(&self, id: RecordId) -> Result<Deleted<R>, ServiceError> {
        let record = self.store.write().delete(id)?;
        info!(event = "record_deleted", kind = %R::KIND, id);
        Ok(Deleted {
            message: format!("{} {} deleted successfully", R::KIND.title(), record.label()),
            record,
        })
    }

    pub fn search(&self, criteria: SearchCriteria<R::Field>) -> Result<SearchOutcome<R>, ServiceError> {
        let store = self.store.read();
        let matches = query::run(store.scan(), &criteria)?;
        debug!(event = "search", kind = %R::KIND, total = matches.total);
        Ok(SearchOutcome {
            results: matches.results.into_iter().cloned().collect(),
            total: matches.total,
            criteria,
        })
    }

    pub fn count(&self) -> usize {
        self.store.read().len()
    }
}

/// Unique text fields compare case-insensitively; `except` skips the record
/// being updated.
fn ensure_unique<R: Record>(
    store: &CollectionStore<R>,
    candidate: &R,
    except: Option<RecordId>,
) -> Result<(), ServiceError> {
    for field in R::unique_fields() {
        let FieldValue::Text(wanted) = candidate.field(*field) else { continue };
        let wanted = wanted.to_lowercase();
        let taken = store
            .scan()
            .filter(|r| Some(r.id()) != except)
            .any(|r| matches!(r.field(*field), FieldValue::Text(v) if v.to_lowercase() == wanted));
        if taken {
            return Err(ServiceError::Conflict(format!("{} already registered", field.name())));
        }
    }
    Ok(())
}

impl<R: Record> StatsSource for ResourceService<R> {
    fn tally(&self) -> KindStats {
        let store = self.store.read();
        let flagged = R::status_field().map(|f| {
            store.scan().filter(|r| matches!(r.field(f), FieldValue::Flag(true))).count()
        });
        KindStats { kind: R::KIND, total: store.len(), flagged }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{
        Item, ItemField, ItemPatch, NewItem, NewPost, NewUser, PatchField, Post, PostPatch, User, UserField, UserPatch,
    };

    fn users() -> ResourceService<User> {
        ResourceService::new()
    }

    #[test]
    fn create_assigns_monotonic_ids_never_reused() {
        let svc = users();
        let a = svc.create(NewUser::new("Alice", "a@x.io", 30)).unwrap();
        let b = svc.create(NewUser::new("Bob", "b@x.io", 31)).unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        svc.delete(b.id).unwrap();
        let c = svc.create(NewUser::new("Carol", "c@x.io", 32)).unwrap();
        assert_eq!(c.id, 3);
        assert!(c.created_at.is_some());
    }

    #[test]
    fn duplicate_email_conflicts_and_leaves_store_unchanged() {
        let svc = users();
        svc.create(NewUser::new("Alice", "a@x.io", 30)).unwrap();
        let err = svc.create(NewUser::new("Alicia", "A@X.io", 22)).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(svc.count(), 1);
        // failed create does not consume an identity
        assert_eq!(svc.create(NewUser::new("Bob", "b@x.io", 1)).unwrap().id, 2);
    }

    #[test]
    fn negative_age_is_a_validation_error() {
        let svc = users();
        let err = svc.create(NewUser::new("Neg", "n@x.io", -1)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { field: "age", .. }));
        assert_eq!(svc.count(), 0);
    }

    #[test]
    fn partial_update_touches_only_present_fields() {
        let svc = users();
        let u = svc.create(NewUser::new("Alice", "a@x.io", 30)).unwrap();
        let patch = UserPatch { age: PatchField::Set(31), ..Default::default() };
        let updated = svc.update(u.id, patch).unwrap();
        assert_eq!(updated.age, 31);
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.email, "a@x.io");
        assert_eq!(updated.created_at, u.created_at);
    }

    #[test]
    fn update_to_taken_email_conflicts() {
        let svc = users();
        svc.create(NewUser::new("Alice", "a@x.io", 30)).unwrap();
        let bob = svc.create(NewUser::new("Bob", "b@x.io", 30)).unwrap();
        let patch = UserPatch { email: PatchField::Set("a@x.io".into()), ..Default::default() };
        assert!(matches!(svc.update(bob.id, patch), Err(ServiceError::Conflict(_))));
        assert_eq!(svc.read(bob.id).unwrap().email, "b@x.io");
        // re-saving one's own email is fine
        let same = UserPatch { email: PatchField::Set("B@x.io".into()), ..Default::default() };
        assert!(svc.update(bob.id, same).is_ok());
    }

    #[test]
    fn null_on_required_field_is_rejected_before_mutation() {
        let svc = users();
        let u = svc.create(NewUser::new("Alice", "a@x.io", 30)).unwrap();
        let patch = UserPatch { name: PatchField::Null, age: PatchField::Set(40), ..Default::default() };
        assert!(matches!(svc.update(u.id, patch), Err(ServiceError::Validation { field: "name", .. })));
        assert_eq!(svc.read(u.id).unwrap(), u);
    }

    #[test]
    fn null_clears_nullable_tax() {
        let svc = ResourceService::<Item>::new();
        let item = svc.create(NewItem::new("Laptop", "fast", 999.99).with_tax(99.99)).unwrap();
        let patch = ItemPatch { tax: PatchField::Null, ..Default::default() };
        assert_eq!(svc.update(item.id, patch).unwrap().tax, None);
    }

    #[test]
    fn missing_records_are_not_found() {
        let svc = users();
        svc.create(NewUser::new("Ann", "ann@x.io", 30)).unwrap();
        svc.create(NewUser::new("Bob", "bob@x.io", 40)).unwrap();
        let before = svc.list(Pagination::default()).items;

        assert!(matches!(svc.read(9), Err(ServiceError::NotFound { id: 9, .. })));
        assert!(matches!(svc.update(9, UserPatch::default()), Err(ServiceError::NotFound { .. })));
        assert!(matches!(svc.delete(9), Err(ServiceError::NotFound { .. })));

        assert_eq!(svc.list(Pagination::default()).items, before);
        assert_eq!(svc.create(NewUser::new("Cy", "cy@x.io", 50)).unwrap().id, 3);
    }

    #[test]
    fn delete_confirms_with_label() {
        let svc = ResourceService::<Post>::new();
        let p = svc.create(NewPost::new("Hello", "body", "me")).unwrap();
        let done = svc.delete(p.id).unwrap();
        assert_eq!(done.message, "Post Hello deleted successfully");
        assert_eq!(done.record, p);
        assert!(svc.read(p.id).is_err());
    }

    #[test]
    fn list_reports_window_and_total() {
        let svc = users();
        for i in 0..5 {
            svc.create(NewUser::new(format!("U{i}"), format!("u{i}@x.io"), 20)).unwrap();
        }
        let page = svc.list(Pagination::new(3, 10));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 5);
        assert!(svc.list(Pagination::new(10, 10)).items.is_empty());
        assert_eq!(svc.list(Pagination::default()).items.len(), 5);
    }

    #[test]
    fn search_echoes_criteria() {
        let svc = ResourceService::<Item>::new();
        svc.create(NewItem::new("Test Item", "A test item", 29.99)).unwrap();
        svc.create(NewItem::new("Other", "nothing", 5.0)).unwrap();
        let criteria = SearchCriteria::new()
            .text("test", [ItemField::Name, ItemField::Description])
            .range(ItemField::Price, Some(10.0), Some(50.0));
        let out = svc.search(criteria.clone()).unwrap();
        assert_eq!(out.total, 1);
        assert_eq!(out.results[0].name, "Test Item");
        assert_eq!(out.criteria, criteria);
    }

    #[test]
    fn search_by_name_and_email() {
        let svc = users();
        svc.create(NewUser::new("John Doe", "john@example.com", 30)).unwrap();
        svc.create(NewUser::new("Jane Smith", "jane@example.com", 25)).unwrap();
        let out = svc
            .search(SearchCriteria::new().contains(UserField::Name, "j").contains(UserField::Email, "jane"))
            .unwrap();
        assert_eq!(out.results.len(), 1);
        assert_eq!(out.results[0].name, "Jane Smith");
    }

    #[test]
    fn stats_count_flagged_records() {
        let posts = ResourceService::<Post>::new();
        posts.create(NewPost::new("a", "b", "c").published()).unwrap();
        posts.create(NewPost::new("d", "e", "f")).unwrap();
        let tally = posts.tally();
        assert_eq!((tally.total, tally.flagged), (2, Some(1)));
        let patch = PostPatch { published: PatchField::Set(true), ..Default::default() };
        posts.update(2, patch).unwrap();
        assert_eq!(posts.tally().flagged, Some(2));
        assert_eq!(ResourceService::<Item>::new().tally().flagged, None);
    }
}
