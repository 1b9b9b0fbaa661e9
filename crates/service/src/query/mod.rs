//! Query engine: pure filters over a read-only scan of a collection.
//!
//! Every function takes an iterator of record references and returns a lazy
//! iterator; nothing here can mutate a store. [`run`] composes the filters
//! described by a [`SearchCriteria`].

pub mod criteria;

use std::cmp::Ordering;

use models::{FieldValue, Record, Scalar};

use crate::errors::ServiceError;
pub use criteria::{EqualityFilter, RangeFilter, SearchCriteria, SortSpec, SubstringFilter, TextFilter};

/// Substring needle, pre-lowered when matching case-insensitively.
#[derive(Clone, Debug)]
struct Needle {
    text: String,
    case_insensitive: bool,
}

impl Needle {
    fn new(text: &str, case_insensitive: bool) -> Self {
        let text = if case_insensitive { text.to_lowercase() } else { text.to_string() };
        Self { text, case_insensitive }
    }

    fn in_text(&self, haystack: &str) -> bool {
        if self.case_insensitive {
            haystack.to_lowercase().contains(&self.text)
        } else {
            haystack.contains(&self.text)
        }
    }

    fn found_in(&self, value: FieldValue<'_>) -> bool {
        match value {
            FieldValue::Text(s) => self.in_text(s),
            FieldValue::Tags(tags) => tags.iter().any(|t| self.in_text(t)),
            _ => false,
        }
    }
}

/// Keep records whose `field` contains `needle`.
pub fn filter_by_substring<'a, R, I>(
    records: I,
    field: R::Field,
    needle: &str,
    case_insensitive: bool,
) -> impl Iterator<Item = &'a R> + 'a
where
    R: Record,
    I: Iterator<Item = &'a R> + 'a,
{
    filter_by_any_substring(records, vec![field], needle, case_insensitive)
}

/// Keep records where at least one of `fields` contains `needle`.
pub fn filter_by_any_substring<'a, R, I>(
    records: I,
    fields: Vec<R::Field>,
    needle: &str,
    case_insensitive: bool,
) -> impl Iterator<Item = &'a R> + 'a
where
    R: Record,
    I: Iterator<Item = &'a R> + 'a,
{
    let needle = Needle::new(needle, case_insensitive);
    records.filter(move |r| fields.iter().any(|f| needle.found_in(r.field(*f))))
}

/// Keep records with `min <= field <= max`; an absent bound is unconstrained.
///
/// With at least one bound present, records whose field is null or
/// non-numeric are dropped.
pub fn filter_by_range<'a, R, I>(
    records: I,
    field: R::Field,
    min: Option<f64>,
    max: Option<f64>,
) -> impl Iterator<Item = &'a R> + 'a
where
    R: Record,
    I: Iterator<Item = &'a R> + 'a,
{
    records.filter(move |r| {
        if min.is_none() && max.is_none() {
            return true;
        }
        match r.field(field).as_number() {
            Some(v) => min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m),
            None => false,
        }
    })
}

pub fn filter_by_equality<'a, R, I>(records: I, field: R::Field, value: Scalar) -> impl Iterator<Item = &'a R> + 'a
where
    R: Record,
    I: Iterator<Item = &'a R> + 'a,
{
    records.filter(move |r| r.field(field).matches(&value))
}

/// Same clamping as `CollectionStore::list`.
pub fn paginate<I: Iterator>(records: I, offset: usize, limit: usize) -> impl Iterator<Item = I::Item> {
    records.skip(offset).take(limit)
}

/// Reject non-finite bounds and `min > max`.
pub fn check_bounds(name: &str, min: Option<f64>, max: Option<f64>) -> Result<(), ServiceError> {
    for bound in [min, max].into_iter().flatten() {
        if !bound.is_finite() {
            return Err(ServiceError::invalid_query(format!("{name} bounds must be finite numbers")));
        }
    }
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(ServiceError::invalid_query(format!(
                "{name} minimum ({lo}) must not exceed maximum ({hi})"
            )));
        }
    }
    Ok(())
}

fn compare(a: FieldValue<'_>, b: FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Text(x), FieldValue::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (FieldValue::Number(x), FieldValue::Number(y)) => x.total_cmp(&y),
        (FieldValue::Flag(x), FieldValue::Flag(y)) => x.cmp(&y),
        // nulls sort last
        (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
        (FieldValue::Null, _) => Ordering::Greater,
        (_, FieldValue::Null) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Matching records plus the match count before pagination.
#[derive(Debug)]
pub struct Matches<'a, R> {
    pub results: Vec<&'a R>,
    pub total: usize,
}

/// Evaluate `criteria`: text match (OR across its fields) AND substrings AND
/// ranges AND equalities, then a stable sort, then the page window.
pub fn run<'a, R, I>(records: I, criteria: &SearchCriteria<R::Field>) -> Result<Matches<'a, R>, ServiceError>
where
    R: Record,
    I: Iterator<Item = &'a R> + 'a,
{
    criteria.validate()?;
    let ci = criteria.case_insensitive;

    let mut it: Box<dyn Iterator<Item = &'a R> + 'a> = Box::new(records);
    if let Some(text) = &criteria.text {
        it = Box::new(filter_by_any_substring::<R, _>(it, text.fields.clone(), &text.needle, ci));
    }
    for s in &criteria.substrings {
        it = Box::new(filter_by_substring::<R, _>(it, s.field, &s.needle, ci));
    }
    for r in &criteria.ranges {
        it = Box::new(filter_by_range::<R, _>(it, r.field, r.min, r.max));
    }
    for e in &criteria.equals {
        it = Box::new(filter_by_equality::<R, _>(it, e.field, e.value.clone()));
    }

    let mut matched: Vec<&'a R> = it.collect();
    if let Some(sort) = &criteria.sort {
        matched.sort_by(|a, b| {
            let ord = compare(a.field(sort.field), b.field(sort.field));
            if sort.descending { ord.reverse() } else { ord }
        });
    }

    let total = matched.len();
    let results = match criteria.page {
        Some(page) => paginate(matched.into_iter(), page.skip, page.limit).collect(),
        None => matched,
    };
    Ok(Matches { results, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use models::{Item, ItemField, NewItem, Record};

    use crate::pagination::Pagination;

    fn items() -> Vec<Item> {
        let now = Utc::now();
        vec![
            Item::from_input(1, NewItem::new("Test Item", "A test item", 29.99).with_tags(["test", "example"]), now).unwrap(),
            Item::from_input(2, NewItem::new("Other", "Something else", 5.00), now).unwrap(),
            Item::from_input(3, NewItem::new("Laptop", "High-performance laptop", 999.99).with_tax(99.99).with_tags(["electronics"]), now).unwrap(),
            Item::from_input(4, NewItem::new("Mug", "ceramic TEST mug", 12.99), now).unwrap(),
        ]
    }

    fn names<'a>(it: impl Iterator<Item = &'a Item>) -> Vec<&'a str> {
        it.map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn substring_is_case_insensitive_by_default() {
        let data = items();
        assert_eq!(names(filter_by_substring(data.iter(), ItemField::Name, "test", true)), ["Test Item"]);
        assert!(names(filter_by_substring(data.iter(), ItemField::Name, "test", false)).is_empty());
    }

    #[test]
    fn substring_over_tags_matches_any_tag() {
        let data = items();
        assert_eq!(names(filter_by_substring(data.iter(), ItemField::Tags, "electro", true)), ["Laptop"]);
    }

    #[test]
    fn range_bounds_are_inclusive_and_optional() {
        let data = items();
        assert_eq!(names(filter_by_range(data.iter(), ItemField::Price, Some(5.0), Some(29.99))), ["Test Item", "Other", "Mug"]);
        assert_eq!(names(filter_by_range(data.iter(), ItemField::Price, None, Some(6.0))), ["Other"]);
        assert_eq!(filter_by_range(data.iter(), ItemField::Price, None, None).count(), 4);
    }

    #[test]
    fn range_on_null_field_excludes_record() {
        let data = items();
        assert_eq!(names(filter_by_range(data.iter(), ItemField::Tax, Some(0.0), None)), ["Laptop"]);
    }

    #[test]
    fn equality_on_tags_is_membership() {
        let data = items();
        assert_eq!(names(filter_by_equality(data.iter(), ItemField::Tags, Scalar::from("example"))), ["Test Item"]);
    }

    #[test]
    fn paginate_clamps() {
        let data = items();
        assert_eq!(paginate(data.iter(), 3, 10).count(), 1);
        assert_eq!(paginate(data.iter(), 9, 10).count(), 0);
        assert_eq!(paginate(data.iter(), 1, 2).count(), 2);
    }

    #[test]
    fn text_is_or_across_fields_and_with_price() {
        let data = items();
        let criteria = SearchCriteria::new()
            .text("test", [ItemField::Name, ItemField::Description])
            .range(ItemField::Price, Some(10.0), Some(50.0));
        let m = run(data.iter(), &criteria).unwrap();
        assert_eq!(names(m.results.into_iter()), ["Test Item", "Mug"]);
        assert_eq!(m.total, 2);
    }

    #[test]
    fn sort_and_page_after_filtering() {
        let data = items();
        let criteria = SearchCriteria::new()
            .sort_by(ItemField::Price, true)
            .paginate(Pagination::new(1, 2));
        let m = run(data.iter(), &criteria).unwrap();
        assert_eq!(m.total, 4);
        assert_eq!(names(m.results.into_iter()), ["Test Item", "Mug"]);
    }

    #[test]
    fn inverted_bounds_are_an_invalid_query() {
        let data = items();
        let criteria = SearchCriteria::new().range(ItemField::Price, Some(50.0), Some(10.0));
        assert!(matches!(run(data.iter(), &criteria), Err(ServiceError::InvalidQuery(_))));
    }

    #[test]
    fn filters_do_not_touch_input() {
        let data = items();
        let before = data.clone();
        let _ = run(data.iter(), &SearchCriteria::new().sort_by(ItemField::Name, false)).unwrap();
        assert_eq!(data, before);
    }
}
