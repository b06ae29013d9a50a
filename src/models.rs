use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Journal input
// ---------------------------------------------------------------------------

/// Body of `POST /analyze`. Only `text` drives the analysis; the other fields
/// are accepted from the journaling UI and otherwise ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct JournalRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub weather: Option<String>,
}

impl JournalRequest {
    /// The journal text, or `None` when it is missing or empty.
    /// Whitespace-only text is still an entry.
    pub fn entry_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Mood
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MoodCategory {
    Happy,
    Sad,
    Neutral,
}

impl MoodCategory {
    /// Map a binary sentiment label onto a mood bucket.
    pub fn from_label(label: &str) -> Self {
        match label {
            "POSITIVE" => MoodCategory::Happy,
            "NEGATIVE" => MoodCategory::Sad,
            _ => MoodCategory::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodCategory::Happy => "happy",
            MoodCategory::Sad => "sad",
            MoodCategory::Neutral => "neutral",
        }
    }
}

impl fmt::Display for MoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier verdict. `confidence` is passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    pub mood: MoodCategory,
    pub confidence: f32,
}

impl Sentiment {
    pub fn from_label(label: &str, confidence: f32) -> Self {
        Self {
            mood: MoodCategory::from_label(label),
            confidence,
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlaylistRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SupportPayload {
    pub validation: String,
    pub coping_strategies: Vec<String>,
}

pub const FALLBACK_VALIDATION: &str = "I understand it might be tough.";
pub const FALLBACK_COPING_STRATEGIES: [&str; 2] = ["Take a short walk.", "Try deep breathing."];

impl SupportPayload {
    /// Fixed payload returned whenever support generation fails.
    pub fn fallback() -> Self {
        Self {
            validation: FALLBACK_VALIDATION.to_string(),
            coping_strategies: FALLBACK_COPING_STRATEGIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    pub mood: MoodCategory,
    pub music_recommendations: Vec<PlaylistRef>,
    /// Only produced for the `sad` mood; `null` otherwise.
    pub personalized_message: Option<String>,
    pub support_response: SupportPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
