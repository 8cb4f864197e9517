//! The search capability the use case depends on.

use std::sync::Arc;

use async_trait::async_trait;

use super::dto::{SearchQuery, SearchResult};
use crate::error::Result;

/// A search backend: an in-memory index, a remote service, a hybrid ranker.
///
/// Implementations report their own failures as [`AppError`](crate::AppError)s,
/// normalizing backend errors with [`to_app_error`](crate::to_app_error) or `?`.
/// The use case returns those errors to its caller untouched.
#[async_trait]
pub trait SearchPort: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult>;
}

#[async_trait]
impl<P: SearchPort + ?Sized> SearchPort for &P {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        (**self).search(query).await
    }
}

#[async_trait]
impl<P: SearchPort + ?Sized> SearchPort for Arc<P> {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        (**self).search(query).await
    }
}

#[async_trait]
impl<P: SearchPort + ?Sized> SearchPort for Box<P> {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        (**self).search(query).await
    }
}
