use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::dto::pipeline_dto::{
    ApplicationResponse, ApplyPayload, AssignReviewerPayload, TechnicalReviewPayload,
};
use crate::dto::score_dto::ScoreResponse;
use crate::error::{Error, Result};
use crate::models::actor::Actor;
use crate::services::visibility::{visible_view, ApplicationView};
use crate::AppState;

pub async fn apply(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .pipeline_service
        .apply(&actor, payload.job_id, payload.candidate_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse::from(application)),
    ))
}

pub async fn get_application(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationView>> {
    let application = state
        .store
        .get_application(id)
        .await?
        .ok_or_else(|| Error::not_found("Application", id))?;
    let job = state
        .store
        .get_job(application.job_id)
        .await?
        .ok_or_else(|| Error::not_found("Job", application.job_id))?;
    let view = visible_view(&actor, &application, job.org_id)?;
    Ok(Json(view))
}

pub async fn shortlist(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationResponse>> {
    let application = state.pipeline_service.shortlist(&actor, id).await?;
    Ok(Json(application.into()))
}

pub async fn advance_to_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationResponse>> {
    let application = state.pipeline_service.advance_to_review(&actor, id).await?;
    Ok(Json(application.into()))
}

pub async fn approve_technical(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationResponse>> {
    let application = state.pipeline_service.approve_technical(&actor, id).await?;
    Ok(Json(application.into()))
}

pub async fn reject(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationResponse>> {
    let application = state.pipeline_service.reject(&actor, id).await?;
    Ok(Json(application.into()))
}

pub async fn mark_hired(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationResponse>> {
    let application = state.pipeline_service.mark_hired(&actor, id).await?;
    Ok(Json(application.into()))
}

pub async fn assign_technical_reviewer(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignReviewerPayload>,
) -> Result<Json<ApplicationResponse>> {
    payload.validate()?;
    let application = state
        .pipeline_service
        .assign_technical_reviewer(&actor, id, payload.reviewer_id)
        .await?;
    Ok(Json(application.into()))
}

pub async fn submit_technical_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TechnicalReviewPayload>,
) -> Result<Json<ApplicationResponse>> {
    payload.validate()?;
    let application = state
        .pipeline_service
        .submit_technical_review(&actor, id, payload.score, payload.feedback, payload.decision)
        .await?;
    Ok(Json(application.into()))
}

#[derive(Debug, Serialize)]
pub struct RankedApplication {
    pub application: ApplicationView,
    pub score: Option<ScoreResponse>,
}

/// Employer-facing job pipeline. The gate runs per row, so an agency's
/// pre-shortlist submissions simply do not appear; visible rows are
/// paired with their stored score for ranking.
pub async fn list_for_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<RankedApplication>>> {
    let job = state
        .store
        .get_job(job_id)
        .await?
        .ok_or_else(|| Error::not_found("Job", job_id))?;
    let applications = state.store.list_applications_for_job(job_id).await?;

    let mut rows = Vec::new();
    for application in applications {
        let Ok(view) = visible_view(&actor, &application, job.org_id) else {
            continue;
        };
        let score = state
            .store
            .get_application_score(application.id)
            .await?
            .map(ScoreResponse::application);
        rows.push(RankedApplication {
            application: view,
            score,
        });
    }
    Ok(Json(rows))
}

/// A candidate's own applications.
pub async fn list_own(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ApplicationResponse>>> {
    let applications = state
        .store
        .list_applications_for_candidate(actor.id)
        .await?;
    let mut rows = Vec::new();
    for application in applications {
        let job = state
            .store
            .get_job(application.job_id)
            .await?
            .ok_or_else(|| Error::not_found("Job", application.job_id))?;
        if visible_view(&actor, &application, job.org_id).is_ok() {
            rows.push(application.into());
        }
    }
    Ok(Json(rows))
}

/// An agency's submitted pool, visible to it at every downstream stage.
pub async fn list_agency_pool(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ApplicationResponse>>> {
    let org_id = actor
        .org_id
        .ok_or_else(|| Error::forbidden(actor.id, "agency pool"))?;
    let applications = state.store.list_applications_for_agency(org_id).await?;
    let mut rows = Vec::new();
    for application in applications {
        let job = state
            .store
            .get_job(application.job_id)
            .await?
            .ok_or_else(|| Error::not_found("Job", application.job_id))?;
        if visible_view(&actor, &application, job.org_id).is_ok() {
            rows.push(application.into());
        }
    }
    Ok(Json(rows))
}
