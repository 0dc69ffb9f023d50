use axum::{extract::State, Json};
use chrono::Utc;
use rand::Rng;

use crate::dto::{QuickStats, QuickStatsRequest, QuickStatsResponse};
use crate::error::AppResult;
use crate::AppState;

/// Count and arithmetic mean over one week of mood scores, mean rendered as
/// "7.3/10" with a zero-count guard.
fn week_summary(moods: &[i32]) -> (i64, String) {
    if moods.is_empty() {
        return (0, "0/10".into());
    }
    let mean = moods.iter().map(|m| f64::from(*m)).sum::<f64>() / moods.len() as f64;
    (moods.len() as i64, format!("{:.1}/10", mean))
}

pub async fn get_quick_stats(
    State(state): State<AppState>,
    Json(body): Json<QuickStatsRequest>,
) -> AppResult<Json<QuickStatsResponse>> {
    let user_id = body.validated()?;
    let week_ago = Utc::now() - chrono::Duration::days(7);

    let rows = sqlx::query_scalar::<_, i32>(
        "SELECT mood FROM mood_entries WHERE user_id = $1 AND timestamp >= $2",
    )
    .bind(user_id)
    .bind(week_ago)
    .fetch_all(&state.db)
    .await;

    match rows {
        Ok(moods) => {
            let (moods_this_week, average_mood) = week_summary(&moods);
            let mut rng = rand::thread_rng();
            Ok(Json(QuickStatsResponse {
                success: true,
                error: None,
                stats: QuickStats {
                    moods_this_week,
                    average_mood,
                    // Placeholder counters, not backed by real tracking.
                    wellness_tips_viewed: rng.gen_range(5..20),
                    reports_uploaded: rng.gen_range(0..3),
                    streak_days: rng.gen_range(1..15),
                },
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch stats");
            Ok(Json(QuickStatsResponse {
                success: false,
                error: Some("Failed to fetch stats".into()),
                stats: QuickStats::zeroed(),
            }))
        }
    }
}
