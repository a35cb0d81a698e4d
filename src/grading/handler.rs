use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::bail_grader;
use crate::error::GraderResult;
use crate::extractors::JsonPayload;
use crate::grading::rubric::grading_prompt;
use crate::grading::task::{Essay, GradingRequest, GradingResult};
use crate::AppState;

pub(crate) const MISSING_FIELDS: &str = "topic and text are required";

#[axum_macros::debug_handler(state = AppState)]
pub(crate) async fn handle_grading_request(
    State(state): State<AppState>,
    JsonPayload(req): JsonPayload<GradingRequest>,
) -> GraderResult<Response> {
    let Some(essay) = req.essay() else {
        bail_grader!(StatusCode::BAD_REQUEST, MISSING_FIELDS);
    };

    let grading = grade(&state, essay).await?;
    Ok((StatusCode::OK, [(CONTENT_TYPE, "application/json")], grading).into_response())
}

#[tracing::instrument(
    level = "info",
    skip_all,
    fields(topic_len = essay.topic.len(), text_len = essay.text.len())
)]
async fn grade(state: &AppState, essay: Essay<'_>) -> anyhow::Result<String> {
    let prompt = grading_prompt(&essay);
    let grading = state.generator.generate(&prompt).await?;

    if state.validate_response {
        GradingResult::parse_checked(&grading)?;
    }
    info!("Essay graded");
    Ok(grading)
}
