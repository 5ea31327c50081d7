//! HiAnime scraper library.
//!
//! Turns upstream HiAnime markup into the typed records of `shared::models`.
//! The crate is split into:
//! - `extract`: one extractor per page type, tolerant of missing markup
//! - `fetch`: retrying, caching HTTP access to the upstream sites
//! - `fallback`: a small demo catalog served when the upstream is down
//! - `endpoint`: upstream path builders

pub mod endpoint;
pub mod extract;
pub mod fallback;
pub mod fetch;
pub mod number;

pub use extract::{
    AnimeDetailsExtractor, EpisodesExtractor, HomepageExtractor, PageExtractor, SearchExtractor,
    ServersExtractor, StreamingExtractor,
};
pub use fallback::{FallbackError, FallbackProvider};
pub use fetch::{
    FetchErrorKind, FetchOptions, FetchResult, Fetcher, MemoryCache, ResponseCache, RetryPolicy,
    Upstream,
};
pub use number::parse_number;
