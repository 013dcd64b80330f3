pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::application::{Application, ApplicationStatus, TechnicalStatus};
use crate::models::interview::{Interview, InterviewStatus};
use crate::models::offer::{Offer, OfferStatus};
use crate::models::profile::{AgencyProfile, CandidateProfile, Job};
use crate::models::score::MatchScore;

/// The data-store boundary of the engine: generic insert/update/select
/// against the Application, Interview, Offer and Score tables plus the
/// read-only collaborator records. Held as `Arc<dyn Store>` in `AppState`
/// so the Postgres backend and the in-memory backend are interchangeable.
///
/// Status mutations are conditional writes: the store compares the
/// freshly persisted value against `expected` and returns `None` on a
/// miss, so callers always re-check legality against current state
/// instead of a cached read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    // applications
    async fn insert_application(&self, application: Application) -> Result<Application>;
    async fn get_application(&self, id: Uuid) -> Result<Option<Application>>;
    async fn find_application(&self, job_id: Uuid, candidate_id: Uuid)
        -> Result<Option<Application>>;
    async fn compare_and_set_status(
        &self,
        id: Uuid,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Option<Application>>;
    async fn set_technical_review(
        &self,
        id: Uuid,
        status: TechnicalStatus,
        score: i32,
        feedback: String,
    ) -> Result<Option<Application>>;
    async fn assign_technical_reviewer(&self, id: Uuid, reviewer_id: Uuid)
        -> Result<Option<Application>>;
    async fn list_applications_for_job(&self, job_id: Uuid) -> Result<Vec<Application>>;
    async fn list_applications_for_candidate(&self, candidate_id: Uuid)
        -> Result<Vec<Application>>;
    async fn list_applications_for_agency(&self, agency_id: Uuid) -> Result<Vec<Application>>;

    // interviews
    async fn insert_interview(&self, interview: Interview) -> Result<Interview>;
    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>>;
    /// Conditional close: only succeeds while the interview is still
    /// `scheduled`. Returns `None` once the record has been closed.
    async fn close_interview(
        &self,
        id: Uuid,
        status: InterviewStatus,
        feedback: Option<String>,
        passed: Option<bool>,
    ) -> Result<Option<Interview>>;
    async fn latest_interview(&self, application_id: Uuid) -> Result<Option<Interview>>;

    // offers
    async fn insert_offer(&self, offer: Offer) -> Result<Offer>;
    async fn get_offer(&self, id: Uuid) -> Result<Option<Offer>>;
    async fn find_offer_by_status(
        &self,
        application_id: Uuid,
        status: OfferStatus,
    ) -> Result<Option<Offer>>;
    /// Conditional close from `sent`. Returns `None` on a status miss.
    async fn close_offer(
        &self,
        id: Uuid,
        status: OfferStatus,
        responded_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Offer>>;

    // scores: full-overwrite upserts, at most one live row per key
    async fn upsert_application_score(&self, score: MatchScore) -> Result<MatchScore>;
    async fn upsert_job_match_score(&self, score: MatchScore) -> Result<MatchScore>;
    async fn get_application_score(&self, application_id: Uuid) -> Result<Option<MatchScore>>;
    async fn get_job_match_score(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<MatchScore>>;

    // external collaborator records (owned elsewhere, read-only here
    // apart from seeding)
    async fn get_job(&self, id: Uuid) -> Result<Option<Job>>;
    async fn get_candidate_profile(&self, candidate_id: Uuid) -> Result<Option<CandidateProfile>>;
    async fn get_agency_profile(&self, org_id: Uuid) -> Result<Option<AgencyProfile>>;
    async fn upsert_job(&self, job: Job) -> Result<Job>;
    async fn upsert_candidate_profile(&self, profile: CandidateProfile)
        -> Result<CandidateProfile>;
    async fn upsert_agency_profile(&self, agency: AgencyProfile) -> Result<AgencyProfile>;
}
