use axum::{extract::State, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::dto::{RecentMoodsRequest, RecentMoodsResponse, SaveMoodRequest, SaveMoodResponse};
use crate::error::AppResult;
use crate::models::mood::{scale_entry, sort_recent, MoodEntry};
use crate::AppState;

pub async fn save_mood_entry(
    State(state): State<AppState>,
    Json(body): Json<SaveMoodRequest>,
) -> AppResult<Json<SaveMoodResponse>> {
    let validated = body.validated()?;

    // Label/emoji come from the fixed vocabulary when the client omits them.
    // The mood value is already range-checked, so the lookup cannot miss.
    let (scale_label, scale_emoji) = scale_entry(validated.mood).unwrap_or(("Unknown", "😐"));
    let mood_label = validated
        .mood_label
        .unwrap_or_else(|| scale_label.to_string());
    let mood_emoji = validated
        .mood_emoji
        .unwrap_or_else(|| scale_emoji.to_string());

    let now = Utc::now();
    let entry = sqlx::query_as::<_, MoodEntry>(
        r#"
        INSERT INTO mood_entries (id, user_id, mood, mood_label, mood_emoji, note, timestamp, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&validated.user_id)
    .bind(validated.mood)
    .bind(&mood_label)
    .bind(&mood_emoji)
    .bind(&validated.note)
    .bind(now)
    .bind(now.to_rfc3339())
    .fetch_one(&state.db)
    .await?;

    tracing::info!(id = %entry.id, "Mood entry saved");

    Ok(Json(SaveMoodResponse {
        success: true,
        id: entry.id,
        entry,
    }))
}

pub async fn get_recent_moods(
    State(state): State<AppState>,
    Json(body): Json<RecentMoodsRequest>,
) -> AppResult<Json<RecentMoodsResponse>> {
    let user_id = body.validated()?;

    // Equality filter only; newest-first ordering is computed in-process
    // because the store's ordering is not relied on.
    let rows = sqlx::query_as::<_, MoodEntry>("SELECT * FROM mood_entries WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(&state.db)
        .await;

    match rows {
        Ok(entries) => Ok(Json(RecentMoodsResponse {
            success: true,
            error: None,
            moods: sort_recent(entries, body.limit),
        })),
        // Reads degrade to an empty list so the UI renders "no entries".
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch moods");
            Ok(Json(RecentMoodsResponse {
                success: false,
                error: Some("Failed to fetch moods".into()),
                moods: vec![],
            }))
        }
    }
}
