//! Read-only statistics over one or more record collections.

use chrono::{DateTime, Utc};
use models::RecordKind;
use serde::Serialize;

/// Counts for one kind; `flagged` is `None` for kinds without a status flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct KindStats {
    pub kind: RecordKind,
    pub total: usize,
    pub flagged: Option<usize>,
}

/// Anything that can report counts for one kind.
pub trait StatsSource: Send + Sync {
    fn tally(&self) -> KindStats;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub kinds: Vec<KindStats>,
    pub captured_at: DateTime<Utc>,
}

impl StatsSnapshot {
    pub fn new(kinds: Vec<KindStats>) -> Self {
        Self { kinds, captured_at: Utc::now() }
    }

    fn find(&self, kind: RecordKind) -> Option<&KindStats> {
        self.kinds.iter().find(|k| k.kind == kind)
    }

    pub fn total(&self, kind: RecordKind) -> usize {
        self.find(kind).map_or(0, |k| k.total)
    }

    pub fn flagged(&self, kind: RecordKind) -> usize {
        self.find(kind).and_then(|k| k.flagged).unwrap_or(0)
    }
}

pub struct StatsAggregator<'a> {
    sources: Vec<&'a dyn StatsSource>,
}

impl<'a> StatsAggregator<'a> {
    pub fn new() -> Self {
        Self { sources: Vec::new() }
    }

    pub fn with(mut self, source: &'a dyn StatsSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Each source is read under its own lock; sources are not read atomically
    /// with respect to each other.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot::new(self.sources.iter().map(|s| s.tally()).collect())
    }
}

impl Default for StatsAggregator<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Flat statistics body served over HTTP.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatsReport {
    pub total_users: usize,
    pub total_items: usize,
    pub total_posts: usize,
    pub published_posts: usize,
    pub active_users: usize,
    pub timestamp: DateTime<Utc>,
}

impl From<&StatsSnapshot> for StatsReport {
    fn from(s: &StatsSnapshot) -> Self {
        Self {
            total_users: s.total(RecordKind::User),
            total_items: s.total(RecordKind::Item),
            total_posts: s.total(RecordKind::Post),
            published_posts: s.flagged(RecordKind::Post),
            active_users: s.flagged(RecordKind::User),
            timestamp: s.captured_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(KindStats);

    impl StatsSource for Fixed {
        fn tally(&self) -> KindStats {
            self.0
        }
    }

    #[test]
    fn empty_aggregator_reports_zeroes() {
        let snap = StatsAggregator::new().snapshot();
        assert!(snap.kinds.is_empty());
        let report = StatsReport::from(&snap);
        assert_eq!(report.total_users + report.total_items + report.total_posts, 0);
    }

    #[test]
    fn report_flattens_kinds() {
        let users = Fixed(KindStats { kind: RecordKind::User, total: 3, flagged: Some(2) });
        let posts = Fixed(KindStats { kind: RecordKind::Post, total: 4, flagged: Some(1) });
        let items = Fixed(KindStats { kind: RecordKind::Item, total: 5, flagged: None });
        let snap = StatsAggregator::new().with(&users).with(&items).with(&posts).snapshot();
        let r = StatsReport::from(&snap);
        assert_eq!((r.total_users, r.active_users), (3, 2));
        assert_eq!((r.total_posts, r.published_posts), (4, 1));
        assert_eq!(r.total_items, 5);
        assert_eq!(snap.flagged(RecordKind::Item), 0);
    }
}
