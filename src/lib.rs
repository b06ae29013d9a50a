pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mood Journal API",
        description = "Classifies journal entries and answers with playlists, a supportive note and coping strategies."
    ),
    paths(handlers::home, handlers::analyze_mood),
    components(schemas(
        models::JournalRequest,
        models::MoodCategory,
        models::PlaylistRef,
        models::SupportPayload,
        models::AnalysisResponse,
        models::StatusResponse,
        models::ErrorResponse,
    )),
    tags(
        (name = "journal", description = "Mood analysis of journal entries"),
        (name = "system", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// Build the application router with the given state.
/// Kept out of `main()` so tests can drive the app without binding a port.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/analyze", post(handlers::analyze_mood))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .with_state(state)
}

/// CORS for the journaling frontend: explicit origin allow-list, credentials on.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        // A wildcard cannot be combined with credentials.
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("cors: ignoring invalid origin {:?}: {}", o, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
