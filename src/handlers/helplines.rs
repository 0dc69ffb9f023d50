use axum::Json;

use crate::dto::HelplinesResponse;
use crate::models::helpline::HELPLINES;

pub async fn list_helplines() -> Json<HelplinesResponse> {
    Json(HelplinesResponse {
        success: true,
        helplines: HELPLINES.to_vec(),
    })
}
