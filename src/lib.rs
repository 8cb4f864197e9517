//! search-core
//!
//! Application-layer search: a use case that validates queries and delegates
//! them to a pluggable [`SearchPort`](search::SearchPort), with failures
//! reported as [`AppError`]s from a closed taxonomy.

pub mod config;
pub mod error;
pub mod logging;
pub mod search;
pub mod test_utils;

pub use error::{AppError, ErrorCode, Failure, Result, to_app_error};
