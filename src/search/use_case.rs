//! Search use case: validate the inbound query, then hand it to the port.

use serde_json::{Number, Value};
use tracing::debug;

use super::dto::{Page, PageDto, SearchQuery, SearchQueryDto, SearchResult};
use super::port::SearchPort;
use crate::config::SearchConfig;
use crate::error::{AppError, Result};

pub const Q_REQUIRED: &str = "q is required";
pub const PAGE_REQUIRED: &str = "page.limit and page.offset are required";
pub const LIMIT_OUT_OF_RANGE: &str = "page.limit out of range";
pub const OFFSET_OUT_OF_RANGE: &str = "page.offset out of range";

/// Ports the use case is wired with.
#[derive(Debug, Clone)]
pub struct SearchDeps<P> {
    pub search_port: P,
}

impl<P> SearchDeps<P> {
    pub const fn new(search_port: P) -> Self {
        Self { search_port }
    }
}

/// Run a search with default settings.
///
/// # Errors
///
/// `VALIDATION_ERROR` when the query is rejected (the port is not called),
/// otherwise whatever error the port returned.
pub async fn execute<P: SearchPort>(
    deps: &SearchDeps<P>,
    query: SearchQueryDto,
) -> Result<SearchResult> {
    run(deps, &SearchConfig::default(), query).await
}

/// The search use case bound to its ports and settings.
#[derive(Debug, Clone)]
pub struct SearchUseCase<P> {
    deps: SearchDeps<P>,
    config: SearchConfig,
}

impl<P: SearchPort> SearchUseCase<P> {
    pub fn new(deps: SearchDeps<P>) -> Self {
        Self::with_config(deps, SearchConfig::default())
    }

    pub const fn with_config(deps: SearchDeps<P>, config: SearchConfig) -> Self {
        Self { deps, config }
    }

    #[must_use]
    pub const fn deps(&self) -> &SearchDeps<P> {
        &self.deps
    }

    /// Validate `query` and delegate it to the search port.
    ///
    /// # Errors
    ///
    /// Same as [`execute`].
    pub async fn execute(&self, query: SearchQueryDto) -> Result<SearchResult> {
        run(&self.deps, &self.config, query).await
    }
}

async fn run<P: SearchPort>(
    deps: &SearchDeps<P>,
    config: &SearchConfig,
    query: SearchQueryDto,
) -> Result<SearchResult> {
    let query = match validate_query(query) {
        Ok(query) => query,
        Err(err) => {
            debug!(reason = %err, "Search query rejected");
            return Err(err);
        }
    };

    let page = query.page();
    if config.log_query_text {
        debug!(
            q = query.q(),
            limit = page.limit,
            offset = page.offset,
            has_filters = query.filters().is_some(),
            has_options = query.options().is_some(),
            "Search query accepted"
        );
    } else {
        debug!(
            limit = page.limit,
            offset = page.offset,
            has_filters = query.filters().is_some(),
            has_options = query.options().is_some(),
            "Search query accepted"
        );
    }

    match deps.search_port.search(&query).await {
        Ok(result) => {
            debug!(
                items = result.items.len(),
                total = ?result.total,
                "Search port returned"
            );
            Ok(result)
        }
        Err(err) => {
            debug!(code = %err.code(), "Search port failed");
            Err(err)
        }
    }
}

/// Check an inbound query. The first violated rule decides the error.
///
/// # Errors
///
/// `VALIDATION_ERROR` with one of [`Q_REQUIRED`], [`PAGE_REQUIRED`],
/// [`LIMIT_OUT_OF_RANGE`] or [`OFFSET_OUT_OF_RANGE`].
pub fn validate_query(dto: SearchQueryDto) -> Result<SearchQuery> {
    let SearchQueryDto {
        q,
        page,
        filters,
        options,
    } = dto;

    let q = match q {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Err(AppError::validation(Q_REQUIRED)),
    };

    let (limit, offset) = numeric_page(page.as_ref())
        .ok_or_else(|| AppError::validation(PAGE_REQUIRED))?;

    let limit = integral(limit)
        .and_then(|limit| u32::try_from(limit).ok())
        .filter(|limit| (Page::MIN_LIMIT..=Page::MAX_LIMIT).contains(limit))
        .ok_or_else(|| AppError::validation(LIMIT_OUT_OF_RANGE))?;

    let offset = integral(offset)
        .and_then(|offset| u64::try_from(offset).ok())
        .ok_or_else(|| AppError::validation(OFFSET_OUT_OF_RANGE))?;

    Ok(SearchQuery::from_parts(
        q,
        Page::new(limit, offset),
        filters,
        options,
    ))
}

impl TryFrom<SearchQueryDto> for SearchQuery {
    type Error = AppError;

    fn try_from(dto: SearchQueryDto) -> Result<Self> {
        validate_query(dto)
    }
}

fn numeric_page(page: Option<&PageDto>) -> Option<(&Number, &Number)> {
    let page = page?;
    match (page.limit.as_ref()?, page.offset.as_ref()?) {
        (Value::Number(limit), Value::Number(offset)) => Some((limit, offset)),
        _ => None,
    }
}

/// The number as a whole value, if it has no fractional part.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integral(number: &Number) -> Option<i128> {
    if let Some(value) = number.as_u64() {
        return Some(i128::from(value));
    }
    if let Some(value) = number.as_i64() {
        return Some(i128::from(value));
    }
    let value = number.as_f64()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e30 {
        Some(value as i128)
    } else {
        None
    }
}
