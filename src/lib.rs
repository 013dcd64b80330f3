pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::services::{pipeline_service::PipelineService, scoring_service::ScoringService};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub pipeline_service: PipelineService,
    pub scoring_service: ScoringService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let pipeline_service = PipelineService::new(store.clone());
        let scoring_service = ScoringService::new(store.clone());
        Self {
            store,
            pipeline_service,
            scoring_service,
        }
    }
}

/// Full application router. Split out of `main` so the integration tests
/// can drive it over an in-memory store.
pub fn app_router(state: AppState) -> Router {
    let base_routes = Router::new().route("/health", get(routes::health::health));

    let api = Router::new()
        .route("/api/applications", post(routes::application_routes::apply))
        .route(
            "/api/applications/:id",
            get(routes::application_routes::get_application),
        )
        .route(
            "/api/applications/:id/shortlist",
            post(routes::application_routes::shortlist),
        )
        .route(
            "/api/applications/:id/advance",
            post(routes::application_routes::advance_to_review),
        )
        .route(
            "/api/applications/:id/approve-technical",
            post(routes::application_routes::approve_technical),
        )
        .route(
            "/api/applications/:id/reject",
            post(routes::application_routes::reject),
        )
        .route(
            "/api/applications/:id/hire",
            post(routes::application_routes::mark_hired),
        )
        .route(
            "/api/applications/:id/reviewer",
            post(routes::application_routes::assign_technical_reviewer),
        )
        .route(
            "/api/applications/:id/technical-review",
            post(routes::application_routes::submit_technical_review),
        )
        .route(
            "/api/jobs/:id/applications",
            get(routes::application_routes::list_for_job),
        )
        .route(
            "/api/my/applications",
            get(routes::application_routes::list_own),
        )
        .route(
            "/api/agency/applications",
            get(routes::application_routes::list_agency_pool),
        )
        .route(
            "/api/applications/:id/interviews",
            post(routes::interview_routes::schedule),
        )
        .route(
            "/api/interviews/:id/feedback",
            post(routes::interview_routes::submit_feedback),
        )
        .route(
            "/api/interviews/:id/cancel",
            post(routes::interview_routes::cancel),
        )
        .route(
            "/api/applications/:id/offers",
            post(routes::offer_routes::create),
        )
        .route("/api/offers/:id/respond", post(routes::offer_routes::respond))
        .route("/api/offers/:id/expire", post(routes::offer_routes::expire))
        .route(
            "/api/applications/:id/score",
            get(routes::score_routes::get_application_score)
                .post(routes::score_routes::compute_application_score),
        )
        .route(
            "/api/jobs/:job_id/candidates/:candidate_id/score",
            get(routes::score_routes::get_job_match)
                .post(routes::score_routes::compute_job_match),
        )
        .layer(axum::middleware::from_fn(middleware::auth::require_actor));

    base_routes.merge(api).with_state(state)
}
