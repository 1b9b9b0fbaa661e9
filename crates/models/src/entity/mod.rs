//! SeaORM entities backing the database server.
//!
//! Table layouts mirror the domain records; see `migration` for the schema.

pub mod user;
pub mod item;
pub mod post;
