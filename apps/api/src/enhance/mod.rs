//! AI feedback gateway: flattens a CV to text and forwards it to the LLM
//! with a fixed career-coach prompt, returning the model's prose verbatim.
//! Upstream failures surface as a generic error; internals are only logged.

pub mod prompts;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::cv::CvData;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    pub cv: CvData,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    pub feedback: String,
}

/// Forwards CV text to the model and returns its feedback.
pub async fn enhance_cv(
    llm: &LlmClient,
    cv_content: &str,
    job_description: Option<&str>,
) -> Result<String, AppError> {
    let prompt = prompts::build_feedback_prompt(cv_content, job_description);
    let response = llm
        .call(&prompt, prompts::FEEDBACK_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("CV feedback call failed: {e}")))?;
    response
        .text()
        .map(str::to_string)
        .ok_or_else(|| AppError::Llm("model returned no text content".to_string()))
}

/// POST /api/v1/enhance
pub async fn handle_enhance(
    State(state): State<AppState>,
    Json(request): Json<EnhanceRequest>,
) -> Result<Json<EnhanceResponse>, AppError> {
    let cv_content = request.cv.to_plain_text();
    if cv_content.trim().is_empty() {
        return Err(AppError::Validation("cv content cannot be empty".to_string()));
    }

    let feedback = enhance_cv(&state.llm, &cv_content, request.job_description.as_deref()).await?;
    Ok(Json(EnhanceResponse { feedback }))
}
