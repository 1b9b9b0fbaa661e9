//! Record services: the generic in-memory resource core and its
//! database-backed counterpart.
//! - `storage` holds records, `query` filters them, `resource` guards every mutation.
//! - `stats` reduces collections to counts; `registry` owns the three in-memory kinds.
//! - `db` runs the same operations through SeaORM.

pub mod errors;
pub mod pagination;
pub mod storage;
pub mod query;
pub mod resource;
pub mod stats;
pub mod registry;
pub mod db;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use pagination::Pagination;
pub use query::SearchCriteria;
pub use registry::{ResourceRegistry, SharedRegistry};
pub use resource::{Deleted, Page, ResourceService, SearchOutcome};
pub use stats::{StatsAggregator, StatsReport, StatsSnapshot};
