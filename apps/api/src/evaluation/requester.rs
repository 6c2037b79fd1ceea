//! Evaluation Requester: one prompt, one completion call, raw reply out.

use tracing::info;

use crate::errors::AppError;
use crate::evaluation::inference::InferencePolicy;
use crate::evaluation::prompts::{EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM_TEMPLATE};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::CompletionBackend;

/// Sends the feedback text to the completion backend and returns the unparsed reply.
///
/// `interview_date` falls back to `fallback_date` when absent or blank.
pub async fn request_evaluation(
    backend: &dyn CompletionBackend,
    feedback_text: &str,
    interview_date: Option<&str>,
    fallback_date: &str,
    policy: &InferencePolicy,
) -> Result<String, AppError> {
    if feedback_text.trim().is_empty() {
        return Err(AppError::Validation(
            "No feedback text to evaluate".to_string(),
        ));
    }

    let date = interview_date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(fallback_date);

    let system = build_system_prompt(policy);
    let prompt = build_evaluation_prompt(feedback_text, date, policy);

    info!(
        "Requesting evaluation: {} chars of feedback, interview date {}",
        feedback_text.len(),
        date
    );

    let reply = backend.complete(&system, &prompt).await?;
    Ok(reply)
}

pub fn build_system_prompt(policy: &InferencePolicy) -> String {
    let system = fill_counts(EVALUATION_SYSTEM_TEMPLATE, policy);
    format!("{system}\n\n{JSON_ONLY_SYSTEM}")
}

pub fn build_evaluation_prompt(
    feedback_text: &str,
    interview_date: &str,
    policy: &InferencePolicy,
) -> String {
    // Feedback goes in last so braces inside it are never treated as placeholders.
    fill_counts(EVALUATION_PROMPT_TEMPLATE, policy)
        .replace("{interview_date}", interview_date)
        .replace("{feedback_text}", feedback_text)
}

fn fill_counts(template: &str, policy: &InferencePolicy) -> String {
    template
        .replace("{min_technical}", &policy.min_technical_skills.to_string())
        .replace("{min_soft}", &policy.min_soft_skills.to_string())
        .replace("{min_strengths}", &policy.min_strengths.to_string())
        .replace("{min_areas}", &policy.min_areas_for_improvement.to_string())
}
