//! # MannMitra — Request/Response DTOs
//!
//! All API contract types in one module. Field names are camelCase on the
//! wire, matching the original web client.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Response` → serialized to client JSON
//! - Required-by-contract fields deserialize as `Option` and are checked in
//!   `validated()` methods, so a missing field becomes the
//!   `{success:false, error, step:"validation"}` envelope instead of a
//!   transport-level rejection
//! - Serde defaults are used for optional fields with known defaults

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::helpline::Helpline;
use crate::models::mood::MoodEntry;
use crate::models::wellness::{HealthMetrics, WellnessPlan};

// ============================================================================
// Chat
// ============================================================================

/// Mood descriptor the client attaches to a chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentMood {
    pub value: String,
    pub label: String,
    pub emoji: String,
}

/// One prior exchange unit. Accepted for wire compatibility as advisory
/// context only: never validated, stored, or composed into the prompt.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

/// POST /api/chat
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub text: Option<String>,
    pub current_mood: Option<CurrentMood>,
    pub user_id: Option<String>,
    /// Accepted for wire compatibility; no conversation state is kept.
    #[allow(dead_code)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Chat responses always carry a success shape; `source` distinguishes
/// genuine provider output from locally computed text.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub success: bool,
    pub source: &'static str,
}

// ============================================================================
// Moods
// ============================================================================

/// POST /api/moods
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMoodRequest {
    pub user_id: Option<String>,
    pub mood: Option<i32>,
    pub mood_label: Option<String>,
    pub mood_emoji: Option<String>,
    pub note: Option<String>,
}

/// Narrowed form of `SaveMoodRequest` after validation.
#[derive(Debug)]
pub struct ValidatedMood {
    pub user_id: String,
    pub mood: i32,
    pub mood_label: Option<String>,
    pub mood_emoji: Option<String>,
    pub note: String,
}

impl SaveMoodRequest {
    pub fn validated(self) -> Result<ValidatedMood, AppError> {
        let user_id = match self.user_id {
            Some(ref id) if !id.trim().is_empty() => id.clone(),
            _ => return Err(AppError::Validation("Missing required fields".into())),
        };
        let mood = self
            .mood
            .ok_or_else(|| AppError::Validation("Missing required fields".into()))?;
        if !(1..=10).contains(&mood) {
            return Err(AppError::Validation("Mood must be between 1 and 10".into()));
        }
        Ok(ValidatedMood {
            user_id,
            mood,
            mood_label: self.mood_label,
            mood_emoji: self.mood_emoji,
            note: self.note.unwrap_or_default(),
        })
    }
}

/// POST /api/moods response
#[derive(Debug, Serialize)]
pub struct SaveMoodResponse {
    pub success: bool,
    pub id: Uuid,
    pub entry: MoodEntry,
}

/// POST /api/moods/recent
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMoodsRequest {
    pub user_id: Option<String>,
    #[serde(default = "default_mood_limit")]
    pub limit: usize,
}

fn default_mood_limit() -> usize {
    5
}

impl RecentMoodsRequest {
    pub fn validated(&self) -> Result<&str, AppError> {
        match self.user_id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(AppError::Validation("User ID required".into())),
        }
    }
}

/// POST /api/moods/recent response. `moods` defaults to empty on store
/// failure so the UI renders a "no entries" state instead of crashing.
#[derive(Debug, Serialize)]
pub struct RecentMoodsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub moods: Vec<MoodEntry>,
}

// ============================================================================
// Stats
// ============================================================================

/// POST /api/stats
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStatsRequest {
    pub user_id: Option<String>,
}

impl QuickStatsRequest {
    pub fn validated(&self) -> Result<&str, AppError> {
        match self.user_id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(AppError::Validation("User ID required".into())),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    pub moods_this_week: i64,
    pub average_mood: String,
    pub wellness_tips_viewed: u32,
    pub reports_uploaded: u32,
    pub streak_days: u32,
}

impl QuickStats {
    pub fn zeroed() -> Self {
        Self {
            moods_this_week: 0,
            average_mood: "0/10".into(),
            wellness_tips_viewed: 0,
            reports_uploaded: 0,
            streak_days: 0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuickStatsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub stats: QuickStats,
}

// ============================================================================
// Wellness tips
// ============================================================================

#[derive(Debug, Serialize)]
pub struct WellnessTipsResponse {
    pub success: bool,
    pub tips: Vec<&'static str>,
}

// ============================================================================
// Speech
// ============================================================================

/// POST /api/speech-to-text
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechToTextRequest {
    pub audio_data: Option<String>,
    pub audio_type: Option<String>,
}

/// Always carries a usable `transcription` string — provider failures are
/// converted to the placeholder text, never to an error.
#[derive(Debug, Serialize)]
pub struct SpeechToTextResponse {
    pub transcription: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
}

impl SpeechToTextResponse {
    pub fn transcribed(transcription: String, confidence: f32) -> Self {
        Self {
            transcription,
            confidence: Some(confidence),
            note: None,
            fallback: None,
            error: None,
        }
    }
}

/// POST /api/text-to-speech
#[derive(Debug, Deserialize)]
pub struct TextToSpeechRequest {
    pub text: Option<String>,
}

/// Deliberate no-op passthrough: synthesis happens on the client.
#[derive(Debug, Serialize)]
pub struct TextToSpeechResponse {
    #[serde(rename = "audioContent")]
    pub audio_content: Option<String>,
    #[serde(rename = "useBrowserTTS")]
    pub use_browser_tts: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

// ============================================================================
// Reports & wellness plans
// ============================================================================

/// POST /api/reports/upload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReportRequest {
    pub file_data: Option<String>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

impl UploadReportRequest {
    pub fn validated(&self) -> Result<(&str, &str), AppError> {
        match (self.file_data.as_deref(), self.file_name.as_deref()) {
            (Some(data), Some(name)) if !data.is_empty() && !name.is_empty() => {
                Ok((data, name))
            }
            _ => Err(AppError::Validation(
                "File data and name are required".into(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReportResponse {
    pub success: bool,
    pub extracted_data: HealthMetrics,
    pub wellness_plan: WellnessPlan,
    pub file_name: String,
    pub processing_time: f64,
}

/// POST /api/wellness-plan
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessPlanRequest {
    pub health_data: Option<HealthMetrics>,
}

impl WellnessPlanRequest {
    pub fn validated(self) -> Result<HealthMetrics, AppError> {
        self.health_data
            .ok_or_else(|| AppError::Validation("Health data is required".into()))
    }
}

// ============================================================================
// Diary
// ============================================================================

/// POST /api/diary/reflection
#[derive(Debug, Deserialize)]
pub struct DiaryRequest {
    pub entry: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DiaryResponse {
    pub reflection: &'static str,
}

// ============================================================================
// Helplines
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HelplinesResponse {
    pub success: bool,
    pub helplines: Vec<Helpline>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_moods_limit_defaults_to_five() {
        let req: RecentMoodsRequest = serde_json::from_str(r#"{"userId":"u1"}"#).unwrap();
        assert_eq!(req.limit, 5);
    }

    #[test]
    fn save_mood_requires_user_and_mood() {
        let missing_user = SaveMoodRequest {
            user_id: None,
            mood: Some(5),
            mood_label: None,
            mood_emoji: None,
            note: None,
        };
        assert!(missing_user.validated().is_err());

        let missing_mood = SaveMoodRequest {
            user_id: Some("u1".into()),
            mood: None,
            mood_label: None,
            mood_emoji: None,
            note: None,
        };
        assert!(missing_mood.validated().is_err());
    }

    #[test]
    fn save_mood_rejects_out_of_range_mood() {
        for mood in [0, 11, -1] {
            let req = SaveMoodRequest {
                user_id: Some("u1".into()),
                mood: Some(mood),
                mood_label: None,
                mood_emoji: None,
                note: None,
            };
            assert!(req.validated().is_err(), "mood {} should be rejected", mood);
        }
    }

    #[test]
    fn save_mood_accepts_full_range() {
        for mood in 1..=10 {
            let req = SaveMoodRequest {
                user_id: Some("u1".into()),
                mood: Some(mood),
                mood_label: None,
                mood_emoji: None,
                note: None,
            };
            assert!(req.validated().is_ok(), "mood {} should be accepted", mood);
        }
    }

    #[test]
    fn upload_report_requires_data_and_name() {
        let req: UploadReportRequest =
            serde_json::from_str(r#"{"fileName":"report.pdf"}"#).unwrap();
        assert!(req.validated().is_err());

        let req: UploadReportRequest =
            serde_json::from_str(r#"{"fileData":"aGk=","fileName":"report.pdf"}"#).unwrap();
        assert!(req.validated().is_ok());
    }

    #[test]
    fn chat_request_accepts_advisory_history() {
        let req: ChatRequest = serde_json::from_str(
            r#"{
                "text": "hello",
                "sessionId": "s1",
                "history": [
                    {"role": "user", "text": "earlier"},
                    {"role": "bot", "text": "reply"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(req.history.len(), 2);
        assert_eq!(req.history[1].role, ChatRole::Bot);
    }
}
