use serde::{Deserialize, Deserializer};

use crate::errors::ModelError;

/// One slot of a partial update.
///
/// Decoding distinguishes a key that is missing (`Absent`, via `#[serde(default)]`)
/// from a key explicitly set to `null` (`Null`).
#[derive(Clone, Debug, PartialEq)]
pub enum PatchField<T> {
    Absent,
    Null,
    Set(T),
}

impl<T> Default for PatchField<T> {
    fn default() -> Self {
        PatchField::Absent
    }
}

impl<T> PatchField<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, PatchField::Absent)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            PatchField::Set(v) => Some(v),
            _ => None,
        }
    }

    /// Value of a non-nullable field: `Null` is a validation error.
    pub fn require(&self, field: &'static str) -> Result<Option<&T>, ModelError> {
        match self {
            PatchField::Absent => Ok(None),
            PatchField::Null => Err(ModelError::invalid(field, "must not be null")),
            PatchField::Set(v) => Ok(Some(v)),
        }
    }

    /// Overwrite a non-nullable slot when set.
    pub fn apply(self, slot: &mut T) {
        if let PatchField::Set(v) = self {
            *slot = v;
        }
    }

    /// Overwrite a nullable slot when set or explicitly null.
    pub fn apply_nullable(self, slot: &mut Option<T>) {
        match self {
            PatchField::Absent => {}
            PatchField::Null => *slot = None,
            PatchField::Set(v) => *slot = Some(v),
        }
    }
}

impl<T> From<T> for PatchField<T> {
    fn from(v: T) -> Self {
        PatchField::Set(v)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PatchField<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|v| match v {
            Some(v) => PatchField::Set(v),
            None => PatchField::Null,
        })
    }
}
