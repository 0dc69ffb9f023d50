use axum::Json;

use crate::dto::WellnessTipsResponse;

/// Fixed tip list; same sequence on every call.
pub const WELLNESS_TIPS: [&str; 15] = [
    "Take 5 deep breaths when feeling stressed - inhale for 4 counts, hold for 4, exhale for 6",
    "Drink a glass of water every hour to stay hydrated and boost energy levels",
    "Step outside for 10 minutes of fresh air and natural sunlight daily",
    "Practice gratitude by writing down 3 good things that happened today",
    "Do a quick 2-minute stretch to release tension in your neck and shoulders",
    "Listen to your favorite song and let yourself feel the emotions it brings",
    "Call or text someone you care about - connection boosts mental wellbeing",
    "Take a 5-minute walk, even if it's just around your room or office",
    "Practice the 5-4-3-2-1 grounding technique: 5 things you see, 4 you touch, 3 you hear, 2 you smell, 1 you taste",
    "Set a small, achievable goal for today and celebrate when you complete it",
    "Spend 2 minutes organizing your immediate space - a tidy environment can calm the mind",
    "Practice progressive muscle relaxation: tense and release each muscle group for 5 seconds",
    "Write down one worry, then write one action you can take about it today",
    "Look at photos that make you smile or remind you of happy memories",
    "Do something creative for 10 minutes - draw, write, sing, or craft something",
];

pub async fn get_wellness_tips() -> Json<WellnessTipsResponse> {
    Json(WellnessTipsResponse {
        success: true,
        tips: WELLNESS_TIPS.to_vec(),
    })
}
