//! Pagination utilities for service layer
//!
//! Offset/limit window shared by store listings, search and the database services.

use std::ops::Range;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 10;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// records to skip from the start
    #[serde(default)]
    pub skip: usize,
    /// maximum records returned
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Pagination {
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    /// Fill unspecified parts with the defaults (`skip = 0`, `limit = 10`).
    pub fn from_parts(skip: Option<usize>, limit: Option<usize>) -> Self {
        Self { skip: skip.unwrap_or(0), limit: limit.unwrap_or(DEFAULT_LIMIT) }
    }

    /// `None` when neither part was given, meaning "everything".
    pub fn optional(skip: Option<usize>, limit: Option<usize>) -> Option<Self> {
        if skip.is_none() && limit.is_none() {
            return None;
        }
        Some(Self::from_parts(skip, limit))
    }

    /// Index window `[skip, skip + limit)` clamped to a collection of `len`.
    pub fn window(self, len: usize) -> Range<usize> {
        let start = self.skip.min(len);
        let end = start.saturating_add(self.limit).min(len);
        start..end
    }

    /// Offset and limit as SQL parameters.
    pub fn as_sql(self) -> (u64, u64) {
        (self.skip as u64, self.limit as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { skip: 0, limit: DEFAULT_LIMIT } }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn window_clamps_to_len() {
        assert_eq!(Pagination::new(0, 10).window(3), 0..3);
        assert_eq!(Pagination::new(2, 10).window(3), 2..3);
        assert_eq!(Pagination::new(5, 10).window(3), 3..3);
        assert_eq!(Pagination::new(1, usize::MAX).window(3), 1..3);
    }

    #[test]
    fn window_length_matches_formula() {
        for total in 0..6usize {
            for skip in 0..8usize {
                for limit in 0..8usize {
                    let expected = limit.min(total.saturating_sub(skip));
                    assert_eq!(Pagination::new(skip, limit).window(total).len(), expected);
                }
            }
        }
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.skip, 0);
        assert_eq!(d.limit, 10);
        assert_eq!(Pagination::from_parts(Some(3), None), Pagination::new(3, 10));
    }

    #[test]
    fn optional_is_none_only_without_parts() {
        assert_eq!(Pagination::optional(None, None), None);
        assert_eq!(Pagination::optional(None, Some(4)), Some(Pagination::new(0, 4)));
        assert_eq!(Pagination::optional(Some(2), None), Some(Pagination::new(2, 10)));
    }
}
