//! HTTP gateway over the HiAnime scraper.
//!
//! Every data route fetches an upstream page, extracts it and answers with
//! `{success, data, source}`; when the upstream is unavailable the demo
//! catalog answers instead.

pub mod error;
pub mod handlers;
pub mod orchestrator;
pub mod response;
pub mod router;
pub mod state;
pub mod validation;

pub use error::ApiError;
pub use response::ApiResponse;
pub use router::create_router;
pub use state::AppState;
