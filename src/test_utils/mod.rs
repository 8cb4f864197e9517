//! Shared test utilities for search-core.

pub mod fixtures;

pub use fixtures::{ConfigFixture, RecordingPort, sample_item, sample_result};
