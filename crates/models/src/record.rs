//! The record abstraction shared by every stored kind.
//!
//! A [`Record`] knows its identity, how to build itself from a validated
//! creation input, how to apply a partial patch, and how to expose its
//! queryable fields as [`FieldValue`]s so the query engine can filter it
//! without knowing the concrete type.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::errors::ModelError;

/// Store-assigned identity, unique within one kind.
pub type RecordId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    User,
    Item,
    Post,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::User => "user",
            RecordKind::Item => "item",
            RecordKind::Post => "post",
        }
    }

    /// Capitalized name used in human-readable messages.
    pub fn title(self) -> &'static str {
        match self {
            RecordKind::User => "User",
            RecordKind::Item => "Item",
            RecordKind::Post => "Post",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a queryable field, used to reject ill-typed queries up front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Flag,
    Tags,
}

impl FieldType {
    pub fn is_textual(self) -> bool {
        matches!(self, FieldType::Text | FieldType::Tags)
    }

    pub fn is_sortable(self) -> bool {
        !matches!(self, FieldType::Tags)
    }

    pub fn accepts(self, value: &Scalar) -> bool {
        matches!(
            (self, value),
            (FieldType::Text | FieldType::Tags, Scalar::Text(_))
                | (FieldType::Number, Scalar::Number(_))
                | (FieldType::Flag, Scalar::Flag(_))
        )
    }
}

/// Borrowed view of one field of a record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Flag(bool),
    Tags(&'a [String]),
    Null,
}

impl<'a> FieldValue<'a> {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Equality against an owned scalar; a tag list matches when it contains the text.
    pub fn matches(&self, value: &Scalar) -> bool {
        match (self, value) {
            (FieldValue::Text(a), Scalar::Text(b)) => *a == b.as_str(),
            (FieldValue::Tags(tags), Scalar::Text(b)) => tags.iter().any(|t| t == b),
            (FieldValue::Number(a), Scalar::Number(b)) => a == b,
            (FieldValue::Flag(a), Scalar::Flag(b)) => a == b,
            _ => false,
        }
    }
}

/// Owned comparison value for equality filters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self { Scalar::Flag(v) }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self { Scalar::Number(v) }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self { Scalar::Text(v.to_string()) }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self { Scalar::Text(v) }
}

/// Compile-time field names of one record kind.
pub trait RecordField: Copy + Eq + fmt::Debug + Serialize + Send + Sync + 'static {
    const ALL: &'static [Self];

    fn name(self) -> &'static str;
    fn field_type(self) -> FieldType;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

pub trait Record: Clone + fmt::Debug + PartialEq + Serialize + Send + Sync + 'static {
    /// Creation payload, without identity or timestamps.
    type Input: DeserializeOwned + fmt::Debug + Send + 'static;
    /// Partial update payload as decoded; every field is independently absent, null or set.
    type Patch: DeserializeOwned + Default + fmt::Debug + Send + 'static;
    /// A patch that passed validation, its fields already in their stored types.
    type Changes: Clone + fmt::Debug + Send + 'static;
    type Field: RecordField;

    const KIND: RecordKind;

    fn id(&self) -> RecordId;

    /// Human-readable label used in confirmations (name or title).
    fn label(&self) -> &str;

    fn created_at(&self) -> Option<DateTime<Utc>>;

    fn field(&self, field: Self::Field) -> FieldValue<'_>;

    /// Validate `input` and build the record stored under `id`.
    fn from_input(id: RecordId, input: Self::Input, now: DateTime<Utc>) -> Result<Self, ModelError>;

    /// Validate only the fields the patch touches.
    fn validate_patch(patch: Self::Patch) -> Result<Self::Changes, ModelError>;

    fn apply_patch(&mut self, changes: Self::Changes);

    /// Text fields whose values must be unique within a collection.
    fn unique_fields() -> &'static [Self::Field] {
        &[]
    }

    /// Boolean status field counted by statistics, if the kind has one.
    fn status_field() -> Option<Self::Field> {
        None
    }
}
