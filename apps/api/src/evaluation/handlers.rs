use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::evaluation::models::EvaluationRecord;
use crate::evaluation::normalize::{normalize, NormalizeHints};
use crate::evaluation::pipeline::{evaluate_upload, Upload};
use crate::report::{build_report, markdown::render_markdown};
use crate::state::AppState;

/// POST /api/v1/evaluations
/// Multipart form: `file` (PDF) and `interview_date` (YYYY-MM-DD).
pub async fn handle_submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EvaluationRecord>, AppError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.content_type = field.content_type().map(str::to_string);
                upload.file = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Could not read file: {e}")))?,
                );
            }
            "interview_date" => {
                upload.interview_date = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::Validation(format!("Could not read date: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let record = evaluate_upload(&state, upload).await?;
    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub raw_reply: String,
    pub fallback_role: Option<String>,
    pub fallback_date: Option<String>,
}

/// POST /api/v1/evaluations/normalize
/// Runs only the normalizer over a reply the caller already has. No network, no cache.
pub async fn handle_normalize(
    State(state): State<AppState>,
    Json(req): Json<NormalizeRequest>,
) -> Result<Json<EvaluationRecord>, AppError> {
    let hints = NormalizeHints {
        fallback_role: req.fallback_role,
        fallback_date: req.fallback_date,
        policy: state.config.inference_policy,
    };
    Ok(Json(normalize(&req.raw_reply, &hints)?))
}

/// GET /api/v1/evaluations/latest
pub async fn handle_latest(
    State(state): State<AppState>,
) -> Result<Json<EvaluationRecord>, AppError> {
    Ok(Json(load_latest(&state).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Markdown,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub skills_per_page: Option<usize>,
    #[serde(default)]
    pub format: ReportFormat,
}

/// GET /api/v1/evaluations/latest/report?skills_per_page=&format=json|markdown
pub async fn handle_latest_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let record = load_latest(&state).await?;
    let per_page = query
        .skills_per_page
        .unwrap_or(state.config.skills_per_page);
    let view = build_report(&record, per_page);

    Ok(match query.format {
        ReportFormat::Json => Json(view).into_response(),
        ReportFormat::Markdown => (
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            render_markdown(&view),
        )
            .into_response(),
    })
}

async fn load_latest(state: &AppState) -> Result<EvaluationRecord, AppError> {
    state
        .cache
        .load()
        .await?
        .ok_or_else(|| AppError::NotFound("No evaluation has been submitted yet".to_string()))
}
