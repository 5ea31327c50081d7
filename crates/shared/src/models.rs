//! Data models for the project.
//!
//! Every record here is produced fresh per request, either by an extractor
//! reading upstream markup or by the fallback provider. All records start
//! from their `Default` value so an extractor only has to overwrite what it
//! actually finds.

use serde::{Deserialize, Serialize};

/// Episode counters shown on anime cards.
///
/// `None` means the counter was not present in the markup, which is not the
/// same thing as a counter showing zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpisodeCount {
    pub sub: Option<u32>,
    pub dub: Option<u32>,
    pub eps: Option<u32>,
}

/// Anime card used by homepage sections, search results and sidebar lists
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimeSummary {
    pub id: Option<String>,
    pub title: Option<String>,
    pub alternative_title: Option<String>,
    pub poster: Option<String>,
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub episodes: EpisodeCount,

    // Only populated by the sections that show them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aired: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

impl AnimeSummary {
    /// Whether the card carries anything that identifies an anime
    pub fn has_identity(&self) -> bool {
        self.id.is_some() || self.title.is_some()
    }
}

/// Airing window, kept as the upstream's display strings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiredRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Full anime details page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnimeDetails {
    pub id: Option<String>,
    pub title: Option<String>,
    pub alternative_title: Option<String>,
    pub japanese: Option<String>,
    pub poster: Option<String>,
    pub rating: Option<String>,
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub episodes: EpisodeCount,
    pub synopsis: Option<String>,
    pub synonyms: Vec<String>,
    pub aired: AiredRange,
    pub premiered: Option<String>,
    pub duration: Option<String>,
    pub status: Option<String>,
    pub mal_score: Option<String>,
    pub genres: Vec<String>,
    pub studios: Option<String>,
    pub producers: Vec<String>,
    pub more_seasons: Vec<AnimeSummary>,
    pub related: Vec<AnimeSummary>,
    pub most_popular: Vec<AnimeSummary>,
    pub recommended: Vec<AnimeSummary>,
}

/// Payload of the anime details endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnimeDetailsPage {
    pub anime: AnimeDetails,
    pub episodes: Vec<Episode>,
}

/// Top 10 rankings per time window
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Top10 {
    pub today: Vec<AnimeSummary>,
    pub week: Vec<AnimeSummary>,
    pub month: Vec<AnimeSummary>,
}

/// Everything the homepage shows
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HomepageSnapshot {
    pub spotlight: Vec<AnimeSummary>,
    pub trending: Vec<AnimeSummary>,
    pub top_airing: Vec<AnimeSummary>,
    pub most_popular: Vec<AnimeSummary>,
    pub most_favorite: Vec<AnimeSummary>,
    pub latest_completed: Vec<AnimeSummary>,
    pub latest_episode: Vec<AnimeSummary>,
    pub new_added: Vec<AnimeSummary>,
    pub top_upcoming: Vec<AnimeSummary>,
    pub top10: Top10,
    /// Lowercase genre names, unique, in first-seen order
    pub genres: Vec<String>,
}

/// Pagination state of a listing page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total_pages: u32,
    pub current_page: u32,
    pub has_next_page: bool,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            total_pages: 1,
            current_page: 1,
            has_next_page: false,
        }
    }
}

/// Search results and category listings share this shape
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultPage {
    pub page_info: PageInfo,
    pub response: Vec<AnimeSummary>,
}

/// A single episode in an anime's episode list
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: Option<String>,
    pub number: u32,
    pub title: Option<String>,
    pub alternative_title: Option<String>,
    pub is_filler: bool,
}

/// Payload of the episodes endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeList {
    pub total_episodes: usize,
    pub episodes: Vec<Episode>,
}

impl From<Vec<Episode>> for EpisodeList {
    fn from(episodes: Vec<Episode>) -> Self {
        Self {
            total_episodes: episodes.len(),
            episodes,
        }
    }
}

/// Audio track flavour of a stream
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    #[default]
    Sub,
    Dub,
}

impl StreamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamType::Sub => "sub",
            StreamType::Dub => "dub",
        }
    }
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StreamType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sub" => Ok(StreamType::Sub),
            "dub" => Ok(StreamType::Dub),
            _ => Err(anyhow::anyhow!("Invalid stream type: {}", s)),
        }
    }
}

/// One streaming server offered for an episode
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerEntry {
    /// 1-based, contiguous within its stream type
    pub index: u32,
    #[serde(rename = "type")]
    pub stream_type: StreamType,
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Payload of the servers endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerList {
    pub episode: Option<u32>,
    pub sub: Vec<ServerEntry>,
    pub dub: Vec<ServerEntry>,
}

/// Media file behind a streaming link
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceLink {
    pub file: Option<String>,
    #[serde(rename = "type")]
    pub file_type: Option<String>,
}

/// Start/end offsets in seconds
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// Subtitle or thumbnail track attached to a stream
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub file: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub default: bool,
}

/// Payload of the streaming endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamingLink {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub stream_type: Option<String>,
    pub link: SourceLink,
    pub tracks: Vec<SubtitleTrack>,
    pub intro: TimeRange,
    pub outro: TimeRange,
    pub server: Option<String>,
    pub iframe: Option<String>,
}

/// Where the data of an API response came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    External,
    Fallback,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::External => write!(f, "external"),
            DataSource::Fallback => write!(f, "fallback"),
        }
    }
}
