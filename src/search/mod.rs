//! Search use case, its port, and the DTOs that cross it.
//!
//! The use case owns no search logic: it validates a [`SearchQueryDto`],
//! hands the resulting [`SearchQuery`] to an injected [`SearchPort`], and
//! returns the port's [`SearchResult`] unchanged.

pub mod dto;
pub mod port;
pub mod use_case;

pub use dto::{
    Attributes, Page, PageDto, SearchItem, SearchItemScore, SearchQuery, SearchQueryDto,
    SearchResult,
};
pub use port::SearchPort;
pub use use_case::{SearchDeps, SearchUseCase, execute, validate_query};
