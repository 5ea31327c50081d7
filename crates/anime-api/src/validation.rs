//! Request parameter validation.

use shared::models::StreamType;

use crate::error::ApiError;

/// Anime-list query types accepted by `/animes/{query}`
pub const LIST_QUERIES: [&str; 17] = [
    "top-airing",
    "most-popular",
    "most-favorite",
    "completed",
    "recently-added",
    "recently-updated",
    "top-upcoming",
    "genre",
    "az-list",
    "subbed-anime",
    "dubbed-anime",
    "movie",
    "tv",
    "ova",
    "ona",
    "special",
    "events",
];

/// Genre slugs listed by the upstream site under `/genre/{slug}`
pub const GENRE_SLUGS: [&str; 41] = [
    "action",
    "adventure",
    "cars",
    "comedy",
    "dementia",
    "demons",
    "drama",
    "ecchi",
    "fantasy",
    "game",
    "harem",
    "historical",
    "horror",
    "isekai",
    "josei",
    "kids",
    "magic",
    "martial-arts",
    "mecha",
    "military",
    "music",
    "mystery",
    "parody",
    "police",
    "psychological",
    "romance",
    "samurai",
    "school",
    "sci-fi",
    "seinen",
    "shoujo",
    "shoujo-ai",
    "shounen",
    "shounen-ai",
    "slice-of-life",
    "space",
    "sports",
    "super-power",
    "supernatural",
    "thriller",
    "vampire",
];

/// Non-blank parameter, trimmed
pub fn required(value: Option<&str>, label: &str) -> Result<String, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::validation(format!("{} parameter is required", label)))
}

/// Page number; absent means the first page
pub fn page(value: Option<&str>) -> Result<u32, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(1),
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|page| *page > 0)
            .ok_or_else(|| ApiError::validation("Page parameter must be a valid number")),
    }
}

pub fn stream_type(value: Option<&str>) -> Result<StreamType, ApiError> {
    let raw = required(value, "Type")?;
    raw.parse()
        .map_err(|_| ApiError::validation("Type parameter must be either 'sub' or 'dub'"))
}

/// Check an anime-list query and return the category to use upstream.
///
/// Categories are only kept for `genre` and `az-list`; other queries ignore
/// them.
pub fn list_category(query: &str, category: Option<&str>) -> Result<Option<String>, ApiError> {
    if !LIST_QUERIES.contains(&query) {
        return Err(ApiError::InvalidQuery(query.to_string()));
    }

    let needs_category = matches!(query, "genre" | "az-list");
    if !needs_category {
        return Ok(None);
    }

    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::MissingCategory(query.to_string()))?
        .to_lowercase();

    let (valid, description) = if query == "genre" {
        (GENRE_SLUGS.contains(&category.as_str()), "all genres")
    } else {
        (is_az_category(&category), "0-9, all, other, a-z")
    };

    if !valid {
        return Err(ApiError::InvalidCategory {
            query: query.to_string(),
            valid: description.to_string(),
        });
    }

    Ok(Some(category))
}

fn is_az_category(category: &str) -> bool {
    match category {
        "all" | "other" | "0-9" => true,
        single => single.len() == 1 && single.chars().all(|c| c.is_ascii_lowercase()),
    }
}
