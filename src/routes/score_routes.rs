use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::dto::score_dto::ScoreResponse;
use crate::error::{Error, Result};
use crate::models::actor::{Actor, Role};
use crate::services::visibility::visible_view;
use crate::AppState;

/// Only actors who may read the application may compute or read its
/// score; the gate is re-evaluated here, not cached.
async fn ensure_application_read(
    state: &AppState,
    actor: &Actor,
    application_id: Uuid,
) -> Result<()> {
    let application = state
        .store
        .get_application(application_id)
        .await?
        .ok_or_else(|| Error::not_found("Application", application_id))?;
    let job = state
        .store
        .get_job(application.job_id)
        .await?
        .ok_or_else(|| Error::not_found("Job", application.job_id))?;
    visible_view(actor, &application, job.org_id)?;
    Ok(())
}

fn ensure_job_match_read(actor: &Actor, candidate_id: Uuid) -> Result<()> {
    match actor.role {
        Role::Admin | Role::Employer | Role::Agency => Ok(()),
        Role::Candidate if actor.id == candidate_id => Ok(()),
        _ => Err(Error::forbidden(
            actor.id,
            format!("job match for candidate {candidate_id}"),
        )),
    }
}

pub async fn compute_application_score(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ScoreResponse>> {
    ensure_application_read(&state, &actor, application_id).await?;
    let score = state
        .scoring_service
        .score_application(application_id)
        .await?;
    Ok(Json(ScoreResponse::application(score)))
}

pub async fn get_application_score(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ScoreResponse>> {
    ensure_application_read(&state, &actor, application_id).await?;
    let score = state
        .scoring_service
        .get_application_score(application_id)
        .await?;
    Ok(Json(ScoreResponse::application(score)))
}

pub async fn compute_job_match(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((job_id, candidate_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ScoreResponse>> {
    ensure_job_match_read(&actor, candidate_id)?;
    let score = state
        .scoring_service
        .score_job_match(job_id, candidate_id)
        .await?;
    Ok(Json(ScoreResponse::job_match(score)))
}

pub async fn get_job_match(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((job_id, candidate_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ScoreResponse>> {
    ensure_job_match_read(&actor, candidate_id)?;
    let score = state
        .scoring_service
        .get_job_match_score(job_id, candidate_id)
        .await?;
    Ok(Json(ScoreResponse::job_match(score)))
}
