//! Submission pipeline: validate → extract → request → normalize → cache.
//!
//! Steps run strictly in sequence for one submission. Dropping the future
//! (client disconnect) abandons the pipeline at the next await point; a
//! blocking extraction already in flight finishes on its own thread and is
//! discarded.

use std::sync::Arc;

use axum::body::Bytes;
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::models::EvaluationRecord;
use crate::evaluation::normalize::{normalize, NormalizeHints};
use crate::evaluation::requester::request_evaluation;
use crate::extraction::ExtractionError;
use crate::state::AppState;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// One multipart submission as received, before validation.
#[derive(Debug, Default)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub file: Option<Bytes>,
    pub interview_date: Option<String>,
}

/// An upload that passed validation.
#[derive(Debug)]
pub struct ValidatedUpload {
    pub pdf: Bytes,
    pub interview_date: NaiveDate,
}

/// Checks file presence, type and size, and that the date is ISO `YYYY-MM-DD`.
pub fn validate_upload(upload: Upload, max_bytes: usize) -> Result<ValidatedUpload, AppError> {
    let pdf = upload
        .file
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::Validation("Please select a PDF file".to_string()))?;

    if !looks_like_pdf(upload.content_type.as_deref(), upload.file_name.as_deref()) {
        return Err(AppError::Validation(
            "Please select a valid PDF file".to_string(),
        ));
    }

    if pdf.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "File size exceeds {}MB limit",
            max_bytes / (1024 * 1024)
        )));
    }

    let raw_date = upload
        .interview_date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::Validation("Please select an interview date".to_string()))?;

    let interview_date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!(
            "Interview date '{raw_date}' is not a valid YYYY-MM-DD date"
        ))
    })?;

    Ok(ValidatedUpload {
        pdf,
        interview_date,
    })
}

fn looks_like_pdf(content_type: Option<&str>, file_name: Option<&str>) -> bool {
    let by_type = content_type
        .map(|ct| ct.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false);
    let by_name = file_name
        .map(|n| n.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false);
    by_type || by_name
}

/// Runs the extractor on the blocking pool, bounded by the configured timeout.
pub async fn extract_text(state: &AppState, pdf: Bytes) -> Result<String, ExtractionError> {
    let extractor = Arc::clone(&state.extractor);
    let limit = state.config.extraction_timeout;
    let task = tokio::task::spawn_blocking(move || extractor.extract(&pdf));

    match tokio::time::timeout(limit, task).await {
        Err(_) => Err(ExtractionError::Timeout(limit)),
        Ok(Err(join_err)) => Err(ExtractionError::Aborted(join_err.to_string())),
        Ok(Ok(result)) => result,
    }
}

/// Full submission: returns the normalized record and caches it as the latest.
///
/// A cache write failure is logged and does not fail the submission.
pub async fn evaluate_upload(state: &AppState, upload: Upload) -> Result<EvaluationRecord, AppError> {
    let submission_id = Uuid::new_v4();
    let upload = validate_upload(upload, state.config.max_upload_bytes)?;
    let date = upload.interview_date.format("%Y-%m-%d").to_string();

    info!(
        "[{submission_id}] Extracting text from {} byte PDF",
        upload.pdf.len()
    );
    let text = extract_text(state, upload.pdf).await?;
    info!("[{submission_id}] Extracted {} chars", text.len());

    let reply = request_evaluation(
        state.llm.as_ref(),
        &text,
        Some(&date),
        &state.config.fallback_interview_date,
        &state.config.inference_policy,
    )
    .await?;
    info!("[{submission_id}] Received {} char reply", reply.len());

    let hints = NormalizeHints {
        fallback_date: Some(date),
        policy: state.config.inference_policy,
        ..NormalizeHints::default()
    };
    let record = normalize(&reply, &hints)?;
    info!(
        "[{submission_id}] Normalized evaluation for '{}': {} technical, {} soft skills",
        record.candidate_name,
        record.technical_skills.len(),
        record.soft_skills.len()
    );

    if let Err(e) = state.cache.store(&record).await {
        warn!("[{submission_id}] Failed to cache evaluation: {e}");
    }

    Ok(record)
}
