use models::{FieldType, RecordField, Scalar};
use serde::Serialize;

use super::check_bounds;
use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Free-text needle matched against several text fields (OR).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextFilter<F> {
    pub needle: String,
    pub fields: Vec<F>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubstringFilter<F> {
    pub field: F,
    pub needle: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RangeFilter<F> {
    pub field: F,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EqualityFilter<F> {
    pub field: F,
    pub value: Scalar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SortSpec<F> {
    pub field: F,
    pub descending: bool,
}

/// A composed search over one record kind.
///
/// All filters are ANDed. The echo returned by a search serializes this
/// value as-is.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchCriteria<F> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextFilter<F>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub substrings: Vec<SubstringFilter<F>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<RangeFilter<F>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub equals: Vec<EqualityFilter<F>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec<F>>,
    pub case_insensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<Pagination>,
}

impl<F> Default for SearchCriteria<F> {
    fn default() -> Self {
        Self {
            text: None,
            substrings: Vec::new(),
            ranges: Vec::new(),
            equals: Vec::new(),
            sort: None,
            case_insensitive: true,
            page: None,
        }
    }
}

impl<F: RecordField> SearchCriteria<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, needle: impl Into<String>, fields: impl IntoIterator<Item = F>) -> Self {
        self.text = Some(TextFilter { needle: needle.into(), fields: fields.into_iter().collect() });
        self
    }

    pub fn contains(mut self, field: F, needle: impl Into<String>) -> Self {
        self.substrings.push(SubstringFilter { field, needle: needle.into() });
        self
    }

    pub fn range(mut self, field: F, min: Option<f64>, max: Option<f64>) -> Self {
        self.ranges.push(RangeFilter { field, min, max });
        self
    }

    pub fn equals(mut self, field: F, value: impl Into<Scalar>) -> Self {
        self.equals.push(EqualityFilter { field, value: value.into() });
        self
    }

    pub fn sort_by(mut self, field: F, descending: bool) -> Self {
        self.sort = Some(SortSpec { field, descending });
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }

    pub fn paginate(mut self, page: Pagination) -> Self {
        self.page = Some(page);
        self
    }

    /// Reject criteria that reference fields of the wrong shape or carry
    /// unusable bounds.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if let Some(text) = &self.text {
            if text.fields.is_empty() {
                return Err(ServiceError::invalid_query("text search needs at least one field"));
            }
            for f in &text.fields {
                require_textual(*f)?;
            }
        }
        for s in &self.substrings {
            require_textual(s.field)?;
        }
        for r in &self.ranges {
            if r.field.field_type() != FieldType::Number {
                return Err(ServiceError::invalid_query(format!(
                    "range filter on non-numeric field `{}`",
                    r.field.name()
                )));
            }
            check_bounds(r.field.name(), r.min, r.max)?;
        }
        for e in &self.equals {
            if !e.field.field_type().accepts(&e.value) {
                return Err(ServiceError::invalid_query(format!(
                    "value {:?} does not fit field `{}`",
                    e.value,
                    e.field.name()
                )));
            }
        }
        if let Some(sort) = &self.sort {
            if !sort.field.field_type().is_sortable() {
                return Err(ServiceError::invalid_query(format!("cannot sort by `{}`", sort.field.name())));
            }
        }
        Ok(())
    }
}

fn require_textual<F: RecordField>(field: F) -> Result<(), ServiceError> {
    if field.field_type().is_textual() {
        Ok(())
    } else {
        Err(ServiceError::invalid_query(format!("substring filter on non-text field `{}`", field.name())))
    }
}
