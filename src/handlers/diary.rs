use axum::Json;
use rand::Rng;

use crate::dto::{DiaryRequest, DiaryResponse};

const DIARY_FALLBACK: &str = "Your words matter. Keep writing 🌱";

/// Canned reflections; a real generation call has not shipped for the diary
/// surface yet.
const REFLECTIONS: [&str; 3] = [
    "Every step forward is a victory, no matter how small 💫",
    "Your courage to share shows your strength within ✨",
    "Growth happens in moments of brave honesty 🌟",
];

pub async fn diary_reflection(Json(body): Json<DiaryRequest>) -> Json<DiaryResponse> {
    let reflection = match body.entry.as_deref().map(str::trim) {
        Some(entry) if !entry.is_empty() => {
            REFLECTIONS[rand::thread_rng().gen_range(0..REFLECTIONS.len())]
        }
        _ => DIARY_FALLBACK,
    };
    Json(DiaryResponse { reflection })
}
