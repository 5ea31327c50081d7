//! Upstream paths, relative to the configured base URL.
//!
//! The returned strings double as the default cache key suffix, so the same
//! request always maps to the same key.

use urlencoding::encode;

pub fn home() -> String {
    "/home".to_string()
}

/// Anime page; serves both the details and the episode list
pub fn anime(id: &str) -> String {
    format!("/{}", encode(id.trim_start_matches('/')))
}

pub fn search(keyword: &str, page: u32) -> String {
    format!("/search?keyword={}&page={}", encode(keyword), page)
}

pub fn suggestions(keyword: &str) -> String {
    format!("/ajax/search/suggest?keyword={}", encode(keyword))
}

pub fn anime_list(query: &str, category: Option<&str>, page: u32) -> String {
    match category {
        Some(category) => format!("/{}/{}?page={}", query, encode(category), page),
        None => format!("/{}?page={}", query, page),
    }
}

pub fn servers(episode_id: &str) -> String {
    format!("/ajax/v2/episode/servers?episodeId={}", encode(episode_id))
}

pub fn streaming(episode_id: &str) -> String {
    format!("/{}", encode(episode_id.trim_start_matches('/')))
}
