use axum::{extract::State, Json};
use std::time::Instant;

use crate::dto::{UploadReportRequest, UploadReportResponse, WellnessPlanRequest};
use crate::error::AppResult;
use crate::models::wellness::{HealthMetrics, WellnessPlan};
use crate::services::wellness_plan::generate_plan;
use crate::AppState;

/// Document extraction is out of scope; a fixed metric set stands in for
/// the extraction step's output.
fn mock_extracted_metrics() -> HealthMetrics {
    [
        ("Hemoglobin", "12.5 g/dL"),
        ("WBC Count", "7,200 cells/μL"),
        ("Vitamin D", "18 ng/mL"),
        ("Cholesterol", "195 mg/dL"),
        ("Blood Sugar", "98 mg/dL"),
        ("Blood Pressure", "120/80 mmHg"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub async fn upload_report(
    State(state): State<AppState>,
    Json(body): Json<UploadReportRequest>,
) -> AppResult<Json<UploadReportResponse>> {
    let (_file_data, file_name) = body.validated()?;
    let started = Instant::now();

    tracing::info!(file_name = %file_name, mime_type = ?body.mime_type, "Processing report upload");

    let extracted_data = mock_extracted_metrics();
    let wellness_plan = generate_plan(state.ai.as_deref(), &extracted_data).await;

    Ok(Json(UploadReportResponse {
        success: true,
        extracted_data,
        wellness_plan,
        file_name: file_name.to_string(),
        processing_time: started.elapsed().as_secs_f64(),
    }))
}

pub async fn generate_wellness_plan(
    State(state): State<AppState>,
    Json(body): Json<WellnessPlanRequest>,
) -> AppResult<Json<WellnessPlan>> {
    let metrics = body.validated()?;
    let plan = generate_plan(state.ai.as_deref(), &metrics).await;
    Ok(Json(plan))
}
