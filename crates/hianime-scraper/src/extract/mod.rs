//! Page extractors.
//!
//! Each extractor turns one kind of upstream page into its typed record.
//! Extraction never fails as a whole: the output starts from `Default`,
//! fields are only overwritten when their element is found, and every list
//! item runs inside [`item`] so a single broken entry is logged and skipped
//! without touching its siblings.

mod details;
mod episodes;
mod homepage;
mod search;
mod selectors;
mod servers;
mod streaming;

pub use details::AnimeDetailsExtractor;
pub use episodes::EpisodesExtractor;
pub use homepage::{HomeSection, HomepageExtractor};
pub use search::SearchExtractor;
pub use servers::ServersExtractor;
pub use streaming::StreamingExtractor;

use scraper::{ElementRef, Html, Selector};
use shared::models::{AnimeSummary, EpisodeCount};
use std::borrow::Cow;
use thiserror::Error;
use tracing::warn;

use crate::number::parse_number;
use selectors::{TICK_DUB, TICK_EPS, TICK_SUB};

/// Maps the markup of one page type to its record
pub trait PageExtractor {
    type Output: Default;

    fn extract(&self, html: &str) -> Self::Output;
}

/// Why a single list item was skipped
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("item has neither an id nor a title")]
    MissingIdentity,

    #[error("server has neither an id nor a name")]
    MissingServer,

    #[error("track is not a subtitle object: {0}")]
    InvalidTrack(String),
}

/// Run one list item inside a fault boundary.
///
/// An error is logged with the section name and index and the item is
/// dropped.
pub fn item<T>(
    section: &str,
    index: usize,
    build: impl FnOnce() -> Result<T, ExtractError>,
) -> Option<T> {
    match build() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(section = section, index = index, error = %e, "Skipping malformed item");
            None
        }
    }
}

/// Unwrap an AJAX body of the form `{"status":true,"html":"..."}`.
///
/// Anything else is returned as is.
pub fn unwrap_ajax(body: &str) -> Cow<'_, str> {
    if !body.trim_start().starts_with('{') {
        return Cow::Borrowed(body);
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match value.get("html").and_then(|html| html.as_str()) {
            Some(html) => Cow::Owned(html.to_string()),
            None => Cow::Borrowed(body),
        },
        Err(_) => Cow::Borrowed(body),
    }
}

pub(crate) fn parse(html: &str) -> Html {
    Html::parse_document(&unwrap_ajax(html))
}

pub(crate) fn first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

/// Text of an element with every text node trimmed, joined without separator
pub(crate) fn text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .concat()
}

pub(crate) fn non_empty_text(element: ElementRef<'_>) -> Option<String> {
    Some(text(element)).filter(|t| !t.is_empty())
}

pub(crate) fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Lazy-loaded `data-src` wins over `src`
pub(crate) fn poster(image: ElementRef<'_>) -> Option<String> {
    attr(image, "data-src").or_else(|| attr(image, "src"))
}

/// Trailing path segment of a link, query string included
pub(crate) fn id_from_href(href: &str) -> Option<String> {
    href.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

pub(crate) fn href_id(element: ElementRef<'_>) -> Option<String> {
    attr(element, "href").and_then(|href| id_from_href(&href))
}

/// Explicit `title` attribute, else the link text
pub(crate) fn link_title(link: ElementRef<'_>) -> Option<String> {
    attr(link, "title").or_else(|| non_empty_text(link))
}

/// Sub, dub and total episode counters found under `scope`.
///
/// A missing total reuses the sub counter, and a missing sub counter
/// leaves the total at zero.
pub(crate) fn episode_count(scope: ElementRef<'_>) -> EpisodeCount {
    let sub = first(scope, &TICK_SUB).map(text);
    let dub = first(scope, &TICK_DUB).map(text);
    let eps = first(scope, &TICK_EPS)
        .map(text)
        .or_else(|| sub.clone())
        .unwrap_or_else(|| "0".to_string());

    EpisodeCount {
        sub: sub.as_deref().map(parse_number),
        dub: dub.as_deref().map(parse_number),
        eps: Some(parse_number(&eps)),
    }
}

/// Reject cards that carry nothing identifying an anime
pub(crate) fn require_identity(summary: AnimeSummary) -> Result<AnimeSummary, ExtractError> {
    if summary.has_identity() {
        Ok(summary)
    } else {
        Err(ExtractError::MissingIdentity)
    }
}
