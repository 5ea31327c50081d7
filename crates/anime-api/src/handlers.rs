//! Route handlers for `/api/v1`.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use hianime_scraper::{
    endpoint, AnimeDetailsExtractor, EpisodesExtractor, HomepageExtractor, PageExtractor,
    SearchExtractor, ServersExtractor, StreamingExtractor,
};
use serde::Deserialize;
use serde_json::json;
use shared::models::{
    AnimeDetailsPage, AnimeSummary, EpisodeList, HomepageSnapshot, SearchResultPage, ServerList,
    StreamingLink,
};

use crate::error::ApiError;
use crate::orchestrator::{resolve, resolve_external};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::validation;

type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    pub id: Option<String>,
    pub server: Option<String>,
    #[serde(rename = "type")]
    pub stream_type: Option<String>,
}

/// API information and endpoint list
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "HiAnime API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "A RESTful API that scrapes anime content from hianime",
        "available_endpoints": [
            "GET /api/v1/ - API information",
            "GET /api/v1/home - Homepage data",
            "GET /api/v1/anime/{id} - Anime details",
            "GET /api/v1/episodes/{id} - Anime episodes",
            "GET /api/v1/search?keyword=&page= - Search anime",
            "GET /api/v1/suggestion?keyword= - Search suggestions",
            "GET /api/v1/animes/{query}/{category}?page= - Anime lists",
            "GET /api/v1/servers?id= - Episode servers",
            "GET /api/v1/stream?id=&server=&type= - Streaming links",
            "GET /api/v1/genres - All genres"
        ]
    }))
}

pub async fn homepage(State(state): State<AppState>) -> ApiResult<HomepageSnapshot> {
    resolve(
        &state,
        &endpoint::home(),
        state.fetcher.options(),
        |html| HomepageExtractor.extract(html),
        |fallback| fallback.homepage(),
    )
    .await
}

pub async fn anime_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<AnimeDetailsPage> {
    let id = validation::required(Some(id.as_str()), "Anime id")?;

    resolve(
        &state,
        &endpoint::anime(&id),
        state.fetcher.options(),
        |html| AnimeDetailsPage {
            anime: AnimeDetailsExtractor.extract(html),
            episodes: EpisodesExtractor.extract(html),
        },
        |fallback| fallback.anime_details(&id),
    )
    .await
}

pub async fn episodes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EpisodeList> {
    let id = validation::required(Some(id.as_str()), "Anime id")?;

    resolve(
        &state,
        &endpoint::anime(&id),
        state.fetcher.options(),
        |html| EpisodeList::from(EpisodesExtractor.extract(html)),
        |fallback| fallback.episodes(&id),
    )
    .await
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<SearchResultPage> {
    let keyword = validation::required(query.keyword.as_deref(), "Keyword")?;
    let page = validation::page(query.page.as_deref())?;

    resolve(
        &state,
        &endpoint::search(&keyword, page),
        state.fetcher.options(),
        |html| SearchExtractor.extract(html),
        |fallback| fallback.search(&keyword, page),
    )
    .await
}

pub async fn suggestions(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<AnimeSummary>> {
    let keyword = validation::required(query.keyword.as_deref(), "Keyword")?;

    resolve(
        &state,
        &endpoint::suggestions(&keyword),
        state.fetcher.options(),
        |html| SearchExtractor.extract_suggestions(html),
        |fallback| fallback.suggestions(&keyword),
    )
    .await
}

pub async fn anime_list(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<PageQuery>,
) -> ApiResult<SearchResultPage> {
    list(&state, &query, None, params).await
}

pub async fn anime_list_by_category(
    State(state): State<AppState>,
    Path((query, category)): Path<(String, String)>,
    Query(params): Query<PageQuery>,
) -> ApiResult<SearchResultPage> {
    list(&state, &query, Some(&category), params).await
}

async fn list(
    state: &AppState,
    query: &str,
    category: Option<&str>,
    params: PageQuery,
) -> ApiResult<SearchResultPage> {
    let category = validation::list_category(query, category)?;
    let page = validation::page(params.page.as_deref())?;

    resolve_external(
        state,
        &endpoint::anime_list(query, category.as_deref(), page),
        state.fetcher.options(),
        |html| SearchExtractor.extract(html),
    )
    .await
}

pub async fn servers(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> ApiResult<ServerList> {
    let episode_id = validation::required(query.id.as_deref(), "Episode id")?;

    resolve(
        &state,
        &endpoint::servers(&episode_id),
        state.fetcher.options(),
        |html| ServersExtractor.extract(html),
        |fallback| fallback.servers(&episode_id),
    )
    .await
}

pub async fn stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> ApiResult<StreamingLink> {
    let episode_id = validation::required(query.id.as_deref(), "Episode id")?;
    let server = validation::required(query.server.as_deref(), "Server")?;
    let stream_type = validation::stream_type(query.stream_type.as_deref())?;

    let extractor = StreamingExtractor::new(server.clone());
    resolve(
        &state,
        &endpoint::streaming(&episode_id),
        state.fetcher.options(),
        |html| extractor.extract(html),
        |fallback| fallback.streaming(&episode_id, &server, stream_type),
    )
    .await
}

/// Genre names from the homepage sidebar
pub async fn genres(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    resolve(
        &state,
        &endpoint::home(),
        state.fetcher.options(),
        |html| HomepageExtractor.extract(html).genres,
        |fallback| Ok(fallback.genres()),
    )
    .await
}
