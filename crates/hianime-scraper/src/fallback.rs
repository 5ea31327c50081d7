//! Demo data served when the upstream site is unavailable.
//!
//! Every operation returns the same record type as the matching extractor so
//! the API layer can hand either to the client unchanged.

use rand::seq::SliceRandom;
use shared::models::{
    AiredRange, AnimeDetails, AnimeDetailsPage, AnimeSummary, Episode, EpisodeCount, EpisodeList,
    HomepageSnapshot, PageInfo, SearchResultPage, ServerEntry, ServerList, SourceLink, StreamType,
    StreamingLink, SubtitleTrack,
};
use thiserror::Error;
use tracing::info;

const MAX_EPISODES: u32 = 24;
const MAX_SUGGESTIONS: usize = 10;
const SPOTLIGHT_SIZE: usize = 3;
const SECTION_SIZE: usize = 10;

/// Streaming servers offered for every episode: display name and URL slug
const STREAM_SERVERS: [(&str, &str); 3] = [("HD-1", "hd1"), ("HD-2", "hd2"), ("SD", "sd")];
const DUB_SERVERS: usize = 2;

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("Fallback catalog is empty")]
    EmptyCatalog,
}

/// One title of the demo catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub japanese_name: String,
    pub anime_type: String,
    pub episodes: u32,
    pub status: String,
    pub season: String,
    pub year: u16,
    pub score: f32,
    pub image: String,
    pub description: String,
}

impl CatalogEntry {
    #[allow(clippy::too_many_arguments)]
    fn demo(
        id: &str,
        name: &str,
        japanese_name: &str,
        episodes: u32,
        status: &str,
        season: &str,
        year: u16,
        score: f32,
        image: &str,
        description: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            japanese_name: japanese_name.to_string(),
            anime_type: "TV".to_string(),
            episodes,
            status: status.to_string(),
            season: season.to_string(),
            year,
            score,
            image: format!("https://example.com/{}.jpg", image),
            description: description.to_string(),
        }
    }

    fn summary(&self) -> AnimeSummary {
        AnimeSummary {
            id: Some(self.id.clone()),
            title: Some(self.name.clone()),
            alternative_title: Some(self.japanese_name.clone()),
            poster: Some(self.image.clone()),
            anime_type: Some(self.anime_type.clone()),
            episodes: EpisodeCount {
                sub: Some(self.episodes),
                dub: None,
                eps: Some(self.episodes),
            },
            ..Default::default()
        }
    }

    fn matches(&self, needle: &str, with_description: bool) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.japanese_name.to_lowercase().contains(needle)
            || (with_description && self.description.to_lowercase().contains(needle))
    }

    fn episode_list(&self) -> Vec<Episode> {
        (1..=self.episodes.min(MAX_EPISODES))
            .map(|number| Episode {
                id: Some(format!("{}-episode-{}", self.id, number)),
                number,
                title: Some(format!("Episode {}", number)),
                alternative_title: None,
                is_filler: false,
            })
            .collect()
    }
}

/// Serves fixed demo records in place of upstream data
#[derive(Debug, Clone)]
pub struct FallbackProvider {
    catalog: Vec<CatalogEntry>,
    genres: Vec<String>,
}

impl Default for FallbackProvider {
    fn default() -> Self {
        let catalog = vec![
            CatalogEntry::demo(
                "attack-on-titan-100",
                "Attack on Titan",
                "進撃の巨人",
                87,
                "Completed",
                "Spring 2013",
                2013,
                8.8,
                "attack-on-titan",
                "Centuries ago, mankind was slaughtered to near extinction by monstrous humanoid creatures called titans...",
            ),
            CatalogEntry::demo(
                "demon-slayer-101",
                "Demon Slayer: Kimetsu no Yaiba",
                "鬼滅の刃",
                26,
                "Completed",
                "Spring 2019",
                2019,
                8.7,
                "demon-slayer",
                "It is the Taisho Period in Japan. Tanjiro, a kindhearted boy who sells charcoal for a living...",
            ),
            CatalogEntry::demo(
                "one-piece-102",
                "One Piece",
                "ワンピース",
                1000,
                "Ongoing",
                "Fall 1999",
                1999,
                8.9,
                "one-piece",
                "Gol D. Roger was known as the \"Pirate King,\" the strongest and most infamous being to have sailed the Grand Line...",
            ),
            CatalogEntry::demo(
                "jujutsu-kaisen-103",
                "Jujutsu Kaisen",
                "呪術廻戦",
                24,
                "Completed",
                "Fall 2020",
                2020,
                8.5,
                "jujutsu-kaisen",
                "In a world where demons feed on unsuspecting humans, fragments of the legendary and feared demon Ryoumen Sukuna...",
            ),
            CatalogEntry::demo(
                "my-hero-academia-104",
                "My Hero Academia",
                "僕のヒーローアカデミア",
                113,
                "Ongoing",
                "Spring 2016",
                2016,
                8.4,
                "my-hero-academia",
                "The appearance of \"quirks,\" newly discovered super powers, has been steadily increasing over the years...",
            ),
        ];

        let genres = [
            "Action",
            "Adventure",
            "Comedy",
            "Drama",
            "Ecchi",
            "Fantasy",
            "Hentai",
            "Horror",
            "Mahou Shoujo",
            "Mecha",
            "Music",
            "Mystery",
            "Psychological",
            "Romance",
            "Sci-Fi",
            "Slice of Life",
            "Sports",
            "Supernatural",
            "Thriller",
        ]
        .iter()
        .map(|g| g.to_string())
        .collect();

        Self::new(catalog, genres)
    }
}

impl FallbackProvider {
    pub fn new(catalog: Vec<CatalogEntry>, genres: Vec<String>) -> Self {
        Self { catalog, genres }
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    /// Entry with the given id, or the first entry when unknown
    fn lookup(&self, id: &str) -> Result<&CatalogEntry, FallbackError> {
        self.catalog
            .iter()
            .find(|entry| entry.id == id)
            .or_else(|| self.catalog.first())
            .ok_or(FallbackError::EmptyCatalog)
    }

    fn sample(&self, amount: usize) -> Vec<AnimeSummary> {
        self.catalog
            .choose_multiple(&mut rand::thread_rng(), amount.min(self.catalog.len()))
            .map(CatalogEntry::summary)
            .collect()
    }

    pub fn homepage(&self) -> Result<HomepageSnapshot, FallbackError> {
        if self.catalog.is_empty() {
            return Err(FallbackError::EmptyCatalog);
        }
        info!("Using fallback homepage data");

        let spotlight = self
            .sample(SPOTLIGHT_SIZE)
            .into_iter()
            .zip(1..)
            .map(|(mut summary, rank)| {
                summary.rank = Some(rank);
                summary
            })
            .collect();

        Ok(HomepageSnapshot {
            spotlight,
            trending: self.sample(SECTION_SIZE),
            top_airing: self.sample(SECTION_SIZE),
            most_popular: self.sample(SECTION_SIZE),
            latest_episode: self.catalog.iter().take(5).map(CatalogEntry::summary).collect(),
            genres: self.genres(),
            ..Default::default()
        })
    }

    pub fn anime_details(&self, id: &str) -> Result<AnimeDetailsPage, FallbackError> {
        info!(anime_id = id, "Using fallback anime details");
        let entry = self.lookup(id)?;

        let anime = AnimeDetails {
            id: Some(entry.id.clone()),
            title: Some(entry.name.clone()),
            japanese: Some(entry.japanese_name.clone()),
            poster: Some(entry.image.clone()),
            rating: Some("PG-13".to_string()),
            anime_type: Some(entry.anime_type.clone()),
            episodes: EpisodeCount {
                sub: Some(entry.episodes),
                dub: None,
                eps: Some(entry.episodes),
            },
            synopsis: Some(entry.description.clone()),
            aired: AiredRange {
                from: Some(entry.year.to_string()),
                to: None,
            },
            premiered: Some(entry.season.clone()),
            duration: Some("24 min per ep".to_string()),
            status: Some(entry.status.clone()),
            mal_score: Some(entry.score.to_string()),
            studios: Some("Studio 1, Studio 2".to_string()),
            producers: vec!["Producer 1".to_string(), "Producer 2".to_string()],
            ..Default::default()
        };

        Ok(AnimeDetailsPage {
            anime,
            episodes: entry.episode_list(),
        })
    }

    pub fn episodes(&self, id: &str) -> Result<EpisodeList, FallbackError> {
        info!(anime_id = id, "Using fallback episodes data");
        Ok(EpisodeList::from(self.lookup(id)?.episode_list()))
    }

    /// Case-insensitive match on title, japanese title and description.
    /// The catalog fits on one page, so later pages are empty.
    pub fn search(&self, keyword: &str, page: u32) -> Result<SearchResultPage, FallbackError> {
        if self.catalog.is_empty() {
            return Err(FallbackError::EmptyCatalog);
        }
        info!(keyword = keyword, page = page, "Using fallback search results");

        let needle = keyword.to_lowercase();
        let response = if page > 1 {
            Vec::new()
        } else {
            self.catalog
                .iter()
                .filter(|entry| entry.matches(&needle, true))
                .map(CatalogEntry::summary)
                .collect()
        };

        Ok(SearchResultPage {
            page_info: PageInfo {
                total_pages: 1,
                current_page: page,
                has_next_page: false,
            },
            response,
        })
    }

    pub fn suggestions(&self, keyword: &str) -> Result<Vec<AnimeSummary>, FallbackError> {
        if self.catalog.is_empty() {
            return Err(FallbackError::EmptyCatalog);
        }
        info!(keyword = keyword, "Using fallback suggestions data");

        let needle = keyword.to_lowercase();
        Ok(self
            .catalog
            .iter()
            .filter(|entry| entry.matches(&needle, false))
            .take(MAX_SUGGESTIONS)
            .map(CatalogEntry::summary)
            .collect())
    }

    pub fn servers(&self, episode_id: &str) -> Result<ServerList, FallbackError> {
        info!(episode_id = episode_id, "Using fallback servers data");

        let entries = |stream_type: StreamType, count: usize| -> Vec<ServerEntry> {
            STREAM_SERVERS
                .iter()
                .take(count)
                .zip(1..)
                .map(|((name, _), index)| ServerEntry {
                    index,
                    stream_type,
                    id: Some(name.to_lowercase()),
                    name: Some(name.to_string()),
                })
                .collect()
        };

        Ok(ServerList {
            episode: None,
            sub: entries(StreamType::Sub, STREAM_SERVERS.len()),
            dub: entries(StreamType::Dub, DUB_SERVERS),
        })
    }

    /// Link on the named server, or on the first server for unknown names
    pub fn streaming(
        &self,
        episode_id: &str,
        server: &str,
        stream_type: StreamType,
    ) -> Result<StreamingLink, FallbackError> {
        info!(
            episode_id = episode_id,
            server = server,
            stream_type = %stream_type,
            "Using fallback streaming data"
        );

        let (_, slug) = STREAM_SERVERS
            .iter()
            .find(|(name, _)| *name == server)
            .unwrap_or(&STREAM_SERVERS[0]);

        Ok(StreamingLink {
            id: Some(episode_id.to_string()),
            stream_type: Some(stream_type.to_string()),
            link: SourceLink {
                file: Some(format!(
                    "https://example.com/stream/{}/{}/{}",
                    episode_id, stream_type, slug
                )),
                file_type: Some("mp4".to_string()),
            },
            tracks: vec![SubtitleTrack {
                file: "https://example.com/subtitles/sample.vtt".to_string(),
                label: Some("English".to_string()),
                kind: Some("subtitles".to_string()),
                default: true,
            }],
            server: Some(server.to_string()),
            ..Default::default()
        })
    }

    /// Lowercase genre names
    pub fn genres(&self) -> Vec<String> {
        self.genres.iter().map(|g| g.to_lowercase()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_details_known_and_unknown_ids() {
        let provider = FallbackProvider::default();

        let page = provider.anime_details("attack-on-titan-100").unwrap();
        assert_eq!(page.anime.id.as_deref(), Some("attack-on-titan-100"));
        assert_eq!(page.episodes.len(), 24);
        assert_eq!(
            page.episodes[0].id.as_deref(),
            Some("attack-on-titan-100-episode-1")
        );
        assert_eq!(page.episodes[23].title.as_deref(), Some("Episode 24"));
        assert_eq!(page.anime.rating.as_deref(), Some("PG-13"));

        let unknown = provider.anime_details("does-not-exist").unwrap();
        assert_eq!(unknown.anime.id.as_deref(), Some("attack-on-titan-100"));
    }

    #[test]
    fn test_episodes_capped() {
        let provider = FallbackProvider::default();
        assert_eq!(provider.episodes("one-piece-102").unwrap().total_episodes, 24);
        assert_eq!(provider.episodes("jujutsu-kaisen-103").unwrap().total_episodes, 24);
    }

    #[test]
    fn test_homepage_sections() {
        let homepage = FallbackProvider::default().homepage().unwrap();
        assert_eq!(homepage.spotlight.len(), 3);
        assert_eq!(homepage.trending.len(), 5);
        assert_eq!(homepage.genres.len(), 19);
        assert!(homepage.genres.contains(&"slice of life".to_string()));

        let ids: HashSet<_> = homepage.trending.iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids.len(), 5);
        assert_eq!(homepage.spotlight[2].rank, Some(3));
    }

    #[test]
    fn test_search_and_suggestions() {
        let provider = FallbackProvider::default();

        let results = provider.search("TITAN", 1).unwrap();
        assert_eq!(results.response.len(), 1);
        assert_eq!(results.page_info.current_page, 1);

        // Description-only match
        let results = provider.search("charcoal", 1).unwrap();
        assert_eq!(results.response[0].id.as_deref(), Some("demon-slayer-101"));
        assert!(provider.suggestions("charcoal").unwrap().is_empty());

        assert_eq!(provider.suggestions("呪術").unwrap().len(), 1);

        let later = provider.search("titan", 2).unwrap();
        assert!(later.response.is_empty());
        assert_eq!(later.page_info.current_page, 2);
    }

    #[test]
    fn test_servers_and_streaming() {
        let provider = FallbackProvider::default();

        let servers = provider.servers("x").unwrap();
        assert_eq!(servers.sub.len(), 3);
        assert_eq!(servers.dub.len(), 2);
        assert_eq!(servers.sub[2].name.as_deref(), Some("SD"));
        assert_eq!(servers.dub[1].index, 2);

        let link = provider.streaming("ep-1", "HD-2", StreamType::Dub).unwrap();
        assert_eq!(
            link.link.file.as_deref(),
            Some("https://example.com/stream/ep-1/dub/hd2")
        );
        assert_eq!(link.tracks.len(), 1);
        assert!(link.tracks[0].default);

        let link = provider.streaming("ep-1", "Vidstream", StreamType::Sub).unwrap();
        assert_eq!(
            link.link.file.as_deref(),
            Some("https://example.com/stream/ep-1/sub/hd1")
        );
        assert_eq!(link.server.as_deref(), Some("Vidstream"));
    }


    #[test]
    fn test_empty_catalog() {
        let provider = FallbackProvider::new(Vec::new(), Vec::new());
        assert!(matches!(
            provider.anime_details("x"),
            Err(FallbackError::EmptyCatalog)
        ));
        assert!(provider.homepage().is_err());
        assert!(provider.search("a", 1).is_err());
    }
}
