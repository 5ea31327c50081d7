use axum::{routing::get, Router};

use crate::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(handlers::root))
        .route("/home", get(handlers::homepage))
        .route("/anime/{id}", get(handlers::anime_details))
        .route("/episodes/{id}", get(handlers::episodes))
        .route("/search", get(handlers::search))
        .route("/suggestion", get(handlers::suggestions))
        .route("/animes/{query}", get(handlers::anime_list))
        .route("/animes/{query}/{category}", get(handlers::anime_list_by_category))
        .route("/servers", get(handlers::servers))
        .route("/stream", get(handlers::stream))
        .route("/genres", get(handlers::genres));

    Router::new().nest("/api/v1", api).with_state(state)
}
