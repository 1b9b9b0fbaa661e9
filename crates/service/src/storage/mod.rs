//! Storage abstractions for service layer
//!
//! Holds the in-memory collection container that each resource service owns.

pub mod collection_store;
