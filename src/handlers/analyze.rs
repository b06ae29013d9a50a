// ---------------------------------------------------------------------------
// handlers/analyze.rs -- POST /analyze
// ---------------------------------------------------------------------------

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::models::{AnalysisResponse, JournalRequest, MoodCategory, SupportPayload};
use crate::state::AppState;

use super::{ApiError, NO_TEXT_MESSAGE};

/// Substituted when the sad-mood message cannot be generated.
pub const MESSAGE_FALLBACK: &str = "Thank you for sharing your feelings!";

#[utoipa::path(post, path = "/analyze", tag = "journal",
    request_body = JournalRequest,
    responses(
        (status = 200, description = "Mood, playlists and supportive response", body = AnalysisResponse),
        (status = 400, description = "Missing or empty text", body = crate::models::ErrorResponse),
        (status = 500, description = "Unexpected failure", body = crate::models::ErrorResponse)
    )
)]
pub async fn analyze_mood(
    State(state): State<AppState>,
    payload: Result<Json<JournalRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::Internal(format!("unreadable body: {}", rejection.body_text()))
    })?;

    run_analysis(&state, &request).await.map(Json)
}

/// Classify the entry and assemble the response. Only a classifier failure
/// escapes as an error; every other collaborator has a fallback.
pub async fn run_analysis(
    state: &AppState,
    request: &JournalRequest,
) -> Result<AnalysisResponse, ApiError> {
    let text = request
        .entry_text()
        .ok_or_else(|| ApiError::BadRequest(NO_TEXT_MESSAGE.to_string()))?;

    tracing::debug!(
        chars = text.chars().count(),
        has_title = request.title.is_some(),
        has_location = request.location.is_some(),
        has_weather = request.weather.is_some(),
        "analyze: journal entry received"
    );

    let sentiment = state.classifier.classify(text).await?;
    let mood = sentiment.mood;

    let music_recommendations = state.music.recommend(mood).await.unwrap_or_else(|e| {
        tracing::warn!("analyze: music recommendations unavailable: {}", e);
        Vec::new()
    });

    let personalized_message = if mood == MoodCategory::Sad {
        let message = state.messages.generate(mood).await.unwrap_or_else(|e| {
            tracing::warn!("analyze: message generation failed: {}", e);
            MESSAGE_FALLBACK.to_string()
        });
        Some(message)
    } else {
        None
    };

    let support_response = state.support.generate(text, mood).await.unwrap_or_else(|e| {
        tracing::warn!("analyze: support generation failed: {}", e);
        SupportPayload::fallback()
    });

    tracing::info!(
        mood = %mood,
        confidence = sentiment.confidence,
        playlists = music_recommendations.len(),
        "analyze: entry analysed"
    );

    Ok(AnalysisResponse {
        mood,
        music_recommendations,
        personalized_message,
        support_response,
    })
}
