//! Data shapes moved across the use case boundary.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Open attribute bag. Its schema belongs to whichever backend reads it.
pub type Attributes = Map<String, Value>;

/// A page window over a ranked result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Page {
    pub limit: u32,
    pub offset: u64,
}

impl Page {
    pub const MIN_LIMIT: u32 = 1;
    pub const MAX_LIMIT: u32 = 200;

    #[must_use]
    pub const fn new(limit: u32, offset: u64) -> Self {
        Self { limit, offset }
    }
}

/// Paging as the caller sent it. Values stay raw JSON until validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Value>,
}

impl PageDto {
    pub fn new(limit: impl Into<Value>, offset: impl Into<Value>) -> Self {
        Self {
            limit: Some(limit.into()),
            offset: Some(offset.into()),
        }
    }
}

impl From<Page> for PageDto {
    fn from(page: Page) -> Self {
        Self::new(page.limit, page.offset)
    }
}

/// Inbound search request, exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQueryDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(
        default,
        deserialize_with = "page_from_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub page: Option<PageDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Attributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Attributes>,
}

impl SearchQueryDto {
    pub fn new(q: impl Into<String>, limit: impl Into<Value>, offset: impl Into<Value>) -> Self {
        Self {
            q: Some(q.into()),
            page: Some(PageDto::new(limit, offset)),
            filters: None,
            options: None,
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: Attributes) -> Self {
        self.filters = Some(filters);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Attributes) -> Self {
        self.options = Some(options);
        self
    }
}

/// Only a JSON object carries paging. Any other non-null value becomes an
/// empty [`PageDto`] so validation rejects it instead of serde.
fn page_from_value<'de, D>(deserializer: D) -> Result<Option<PageDto>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Object(fields)) => Some(PageDto {
            limit: fields.get("limit").cloned(),
            offset: fields.get("offset").cloned(),
        }),
        Some(_) => Some(PageDto::default()),
    })
}

/// A query that passed validation. Only the use case can build one, so a
/// [`SearchPort`](super::SearchPort) never sees an invalid query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    q: String,
    page: Page,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<Attributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Attributes>,
}

impl SearchQuery {
    pub(crate) const fn from_parts(
        q: String,
        page: Page,
        filters: Option<Attributes>,
        options: Option<Attributes>,
    ) -> Self {
        Self {
            q,
            page,
            filters,
            options,
        }
    }

    /// Query text as sent, surrounding whitespace included.
    #[must_use]
    pub fn q(&self) -> &str {
        &self.q
    }

    #[must_use]
    pub const fn page(&self) -> Page {
        self.page
    }

    #[must_use]
    pub const fn filters(&self) -> Option<&Attributes> {
        self.filters.as_ref()
    }

    #[must_use]
    pub const fn options(&self) -> Option<&Attributes> {
        self.options.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchItemScore {
    pub combined: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexical: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<f64>,
}

impl SearchItemScore {
    #[must_use]
    pub const fn combined(combined: f64) -> Self {
        Self {
            combined,
            lexical: None,
            semantic: None,
        }
    }
}

/// One ranked hit. `payload` is whatever the backend attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub score: SearchItemScore,
    #[serde(default)]
    pub payload: Attributes,
}

/// A page of results. `items` is in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub page: Page,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

impl SearchResult {
    #[must_use]
    pub const fn empty(page: Page) -> Self {
        Self {
            page,
            total: None,
            items: Vec::new(),
        }
    }
}
