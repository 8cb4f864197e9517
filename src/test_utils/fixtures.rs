use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use tempfile::TempDir;

use crate::error::Result;
use crate::search::{Attributes, Page, SearchItem, SearchItemScore, SearchPort, SearchQuery, SearchResult};

/// Stub port that answers every call with the same outcome and remembers
/// the queries it was given.
pub struct RecordingPort {
    outcome: Result<SearchResult>,
    seen: Mutex<Vec<SearchQuery>>,
}

impl RecordingPort {
    #[must_use]
    pub fn returning(result: SearchResult) -> Self {
        Self {
            outcome: Ok(result),
            seen: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn failing(err: crate::AppError) -> Self {
        Self {
            outcome: Err(err),
            seen: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }

    #[must_use]
    pub fn queries(&self) -> Vec<SearchQuery> {
        self.seen.lock().clone()
    }

    #[must_use]
    pub fn last_query(&self) -> Option<SearchQuery> {
        self.seen.lock().last().cloned()
    }
}

#[async_trait]
impl SearchPort for RecordingPort {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        self.seen.lock().push(query.clone());
        self.outcome.clone()
    }
}

#[must_use]
pub fn sample_item(id: &str, combined: f64) -> SearchItem {
    let mut payload = Attributes::new();
    payload.insert("text".to_string(), json!(format!("segment {id}")));
    SearchItem {
        id: id.to_string(),
        kind: "segment".to_string(),
        score: SearchItemScore {
            combined,
            lexical: Some(combined / 2.0),
            semantic: None,
        },
        payload,
    }
}

#[must_use]
pub fn sample_result(page: Page, items: Vec<SearchItem>) -> SearchResult {
    SearchResult {
        page,
        total: Some(items.len() as u64),
        items,
    }
}

/// Temp directory holding config files for a test.
pub struct ConfigFixture {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl ConfigFixture {
    /// # Panics
    ///
    /// If the temp directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    /// # Panics
    ///
    /// If the file cannot be written.
    #[must_use]
    pub fn write_config(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, content).expect("Failed to write config");
        path
    }
}

impl Default for ConfigFixture {
    fn default() -> Self {
        Self::new()
    }
}
