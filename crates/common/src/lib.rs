//! Shared building blocks for the server binaries: logging setup, runtime
//! environment checks and the small response types every router returns.

pub mod types;
pub mod utils;
pub mod env;
