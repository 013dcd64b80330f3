use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::pipeline_dto::{InterviewFeedbackPayload, ScheduleInterviewPayload};
use crate::error::Result;
use crate::models::actor::Actor;
use crate::models::interview::Interview;
use crate::AppState;

pub async fn schedule(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<ScheduleInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .pipeline_service
        .schedule_interview(
            &actor,
            application_id,
            payload.round,
            payload.scheduled_at,
            payload.interviewer_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InterviewFeedbackPayload>,
) -> Result<Json<Interview>> {
    payload.validate()?;
    let interview = state
        .pipeline_service
        .submit_interview_feedback(&actor, id, payload.status, payload.feedback, payload.passed)
        .await?;
    Ok(Json(interview))
}

pub async fn cancel(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Interview>> {
    let interview = state.pipeline_service.cancel_interview(&actor, id).await?;
    Ok(Json(interview))
}
