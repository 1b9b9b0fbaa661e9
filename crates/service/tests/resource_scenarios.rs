use models::{Item, ItemField, NewItem, NewUser, PatchField, Record, User, UserPatch};
use service::{Pagination, ResourceRegistry, ResourceService, SearchCriteria, ServiceError};

#[test]
fn emails_stay_unique_across_create_sequences() {
    let svc = ResourceService::<User>::new();
    let emails = ["a@x.io", "b@x.io", "A@x.io", "c@x.io", "b@X.IO", "a@x.io"];
    for (i, email) in emails.iter().enumerate() {
        let _ = svc.create(NewUser::new(format!("U{i}"), *email, 20));
    }
    let all = svc.list(Pagination::new(0, 100)).items;
    let mut seen: Vec<String> = all.iter().map(|u| u.email.to_lowercase()).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), all.len());
    assert_eq!(all.len(), 3);
}

#[test]
fn read_returns_what_create_returned() {
    let svc = ResourceService::<Item>::new();
    let created = svc.create(NewItem::new("Pen", "blue", 1.5).with_tags(["office"])).unwrap();
    assert_eq!(svc.read(created.id()).unwrap(), created);
}

#[test]
fn list_length_follows_window_formula() {
    let svc = ResourceService::<User>::new();
    for i in 0..7 {
        svc.create(NewUser::new(format!("U{i}"), format!("u{i}@x.io"), 20)).unwrap();
    }
    let total = 7usize;
    for offset in 0..10 {
        for limit in 0..10 {
            let got = svc.list(Pagination::new(offset, limit)).items.len();
            assert_eq!(got, limit.min(total.saturating_sub(offset)), "offset={offset} limit={limit}");
        }
    }
}

#[test]
fn delete_then_read_is_not_found() {
    let svc = ResourceService::<User>::new();
    let u = svc.create(NewUser::new("Gone", "gone@x.io", 1)).unwrap();
    svc.delete(u.id).unwrap();
    assert!(matches!(svc.read(u.id), Err(ServiceError::NotFound { .. })));
}

#[test]
fn created_laptop_is_listed_with_positive_id() {
    let svc = ResourceService::<Item>::new();
    svc.create(NewItem::new("Laptop", "High-performance laptop", 999.99).with_tax(99.99)).unwrap();
    let page = svc.list(Pagination::new(0, 10));
    let laptop = page.items.iter().find(|i| i.name == "Laptop").unwrap();
    assert!(laptop.id > 0);
    assert_eq!(laptop.tax, Some(99.99));
}

#[test]
fn second_user_with_same_email_conflicts() {
    let svc = ResourceService::<User>::new();
    svc.create(NewUser::new("John Doe", "john@example.com", 30)).unwrap();
    let err = svc.create(NewUser::new("John Doe", "john@example.com", 30)).unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(err.kind(), "ConflictError");
}

#[test]
fn text_and_price_search_finds_only_matching_item() {
    let svc = ResourceService::<Item>::new();
    svc.create(NewItem::new("Test Item", "A test item", 29.99)).unwrap();
    svc.create(NewItem::new("Other", "Something", 5.00)).unwrap();
    let out = svc
        .search(
            SearchCriteria::new()
                .text("test", [ItemField::Name, ItemField::Description])
                .range(ItemField::Price, Some(10.0), Some(50.0)),
        )
        .unwrap();
    assert_eq!(out.results.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(), ["Test Item"]);
}

#[test]
fn deactivating_jane_keeps_other_fields() {
    let reg = ResourceRegistry::with_samples().unwrap();
    let before = reg.users.read(2).unwrap();
    let patch = UserPatch { is_active: PatchField::Set(false), ..Default::default() };
    let after = reg.users.update(2, patch).unwrap();
    assert!(!after.is_active);
    assert_eq!(after.name, "Jane Smith");
    assert_eq!(after.age, 25);
    assert_eq!(after.email, before.email);
    assert_eq!(after.created_at, before.created_at);
}

#[test]
fn deleting_missing_id_leaves_store_unchanged() {
    let svc = ResourceService::<User>::new();
    svc.create(NewUser::new("Ann", "ann@x.io", 30)).unwrap();
    svc.create(NewUser::new("Bob", "bob@x.io", 40)).unwrap();
    let before = svc.list(Pagination::new(0, 100));

    assert!(matches!(svc.delete(99), Err(ServiceError::NotFound { id: 99, .. })));

    let after = svc.list(Pagination::new(0, 100));
    assert_eq!(after.items, before.items);
    assert_eq!(after.total, 2);
    // the failed delete did not advance the id counter
    assert_eq!(svc.create(NewUser::new("Cy", "cy@x.io", 50)).unwrap().id, 3);
}

#[test]
fn concurrent_creates_get_distinct_ids() {
    use std::sync::Arc;
    use std::thread;

    let svc = Arc::new(ResourceService::<User>::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || svc.create(NewUser::new(format!("T{i}"), format!("t{i}@x.io"), 20)).unwrap().id)
        })
        .collect();
    let mut ids: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
}
