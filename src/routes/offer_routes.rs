use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::pipeline_dto::{CreateOfferPayload, OfferResponsePayload};
use crate::error::Result;
use crate::models::actor::Actor;
use crate::models::offer::Offer;
use crate::AppState;

pub async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<CreateOfferPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let offer = state
        .pipeline_service
        .create_offer(
            &actor,
            application_id,
            payload.salary,
            payload.currency,
            payload.start_date,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

pub async fn respond(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OfferResponsePayload>,
) -> Result<Json<Offer>> {
    let offer = state
        .pipeline_service
        .respond_to_offer(&actor, id, payload.accepted)
        .await?;
    Ok(Json(offer))
}

pub async fn expire(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Offer>> {
    let offer = state.pipeline_service.expire_offer(&actor, id).await?;
    Ok(Json(offer))
}
