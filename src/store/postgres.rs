use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, TechnicalStatus};
use crate::models::interview::{Interview, InterviewStatus};
use crate::models::offer::{Offer, OfferStatus};
use crate::models::profile::{AgencyProfile, CandidateProfile, Job};
use crate::models::score::MatchScore;

use super::Store;

const APPLICATION_COLUMNS: &str = "id, job_id, candidate_id, agency_id, submitted_by, status, \
     technical_reviewer_id, technical_status, technical_score, technical_feedback, \
     applied_at, updated_at";

/// Production store. Status transitions are conditional UPDATEs
/// (`WHERE status = $expected`), so a stale caller loses the race instead
/// of overwriting a newer state.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_application(&self, application: Application) -> Result<Application> {
        let result = sqlx::query_as::<_, Application>(&format!(
            "INSERT INTO applications \
             (id, job_id, candidate_id, agency_id, submitted_by, status, applied_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(application.id)
        .bind(application.job_id)
        .bind(application.candidate_id)
        .bind(application.agency_id)
        .bind(application.submitted_by)
        .bind(application.status)
        .bind(application.applied_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(Error::DuplicateApplication {
                    job_id: application.job_id,
                    candidate_id: application.candidate_id,
                })
            }
            Err(other) => Err(other.into()),
        }
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications \
             WHERE job_id = $1 AND candidate_id = $2"
        ))
        .bind(job_id)
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn compare_and_set_status(
        &self,
        id: Uuid,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, Application>(&format!(
            "UPDATE applications SET status = $3, updated_at = now() \
             WHERE id = $1 AND status = $2 \
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(expected)
        .bind(next)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_technical_review(
        &self,
        id: Uuid,
        status: TechnicalStatus,
        score: i32,
        feedback: String,
    ) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, Application>(&format!(
            "UPDATE applications \
             SET technical_status = $2, technical_score = $3, technical_feedback = $4, \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(score)
        .bind(feedback)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn assign_technical_reviewer(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, Application>(&format!(
            "UPDATE applications SET technical_reviewer_id = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(reviewer_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_applications_for_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications \
             WHERE job_id = $1 ORDER BY applied_at"
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_applications_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications \
             WHERE candidate_id = $1 ORDER BY applied_at"
        ))
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_applications_for_agency(&self, agency_id: Uuid) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications \
             WHERE agency_id = $1 ORDER BY applied_at"
        ))
        .bind(agency_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_interview(&self, interview: Interview) -> Result<Interview> {
        let row = sqlx::query_as::<_, Interview>(
            "INSERT INTO interviews \
             (id, application_id, round, scheduled_at, interviewer_id, status, created_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(interview.id)
        .bind(interview.application_id)
        .bind(interview.round)
        .bind(interview.scheduled_at)
        .bind(interview.interviewer_id)
        .bind(interview.status)
        .bind(interview.created_by)
        .bind(interview.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        let row = sqlx::query_as::<_, Interview>("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn close_interview(
        &self,
        id: Uuid,
        status: InterviewStatus,
        feedback: Option<String>,
        passed: Option<bool>,
    ) -> Result<Option<Interview>> {
        let row = sqlx::query_as::<_, Interview>(
            "UPDATE interviews \
             SET status = $2, feedback = $3, passed = $4, updated_at = now() \
             WHERE id = $1 AND status = 'scheduled' \
             RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(feedback)
        .bind(passed)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn latest_interview(&self, application_id: Uuid) -> Result<Option<Interview>> {
        let row = sqlx::query_as::<_, Interview>(
            "SELECT * FROM interviews WHERE application_id = $1 \
             ORDER BY scheduled_at DESC LIMIT 1",
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_offer(&self, offer: Offer) -> Result<Offer> {
        let row = sqlx::query_as::<_, Offer>(
            "INSERT INTO offers \
             (id, application_id, salary, currency, start_date, status, sent_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(offer.id)
        .bind(offer.application_id)
        .bind(offer.salary)
        .bind(offer.currency)
        .bind(offer.start_date)
        .bind(offer.status)
        .bind(offer.sent_at)
        .bind(offer.created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_offer(&self, id: Uuid) -> Result<Option<Offer>> {
        let row = sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_offer_by_status(
        &self,
        application_id: Uuid,
        status: OfferStatus,
    ) -> Result<Option<Offer>> {
        let row = sqlx::query_as::<_, Offer>(
            "SELECT * FROM offers WHERE application_id = $1 AND status = $2 \
             ORDER BY sent_at DESC LIMIT 1",
        )
        .bind(application_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn close_offer(
        &self,
        id: Uuid,
        status: OfferStatus,
        responded_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Offer>> {
        let row = sqlx::query_as::<_, Offer>(
            "UPDATE offers \
             SET status = $2, responded_at = COALESCE(responded_at, $3) \
             WHERE id = $1 AND status = 'sent' \
             RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(responded_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_application_score(&self, score: MatchScore) -> Result<MatchScore> {
        let row = sqlx::query_as::<_, MatchScore>(
            "INSERT INTO application_scores \
             (id, application_id, job_id, candidate_id, score, breakdown, explanation, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (application_id) DO UPDATE \
             SET score = EXCLUDED.score, breakdown = EXCLUDED.breakdown, \
                 explanation = EXCLUDED.explanation, updated_at = now() \
             RETURNING *",
        )
        .bind(score.id)
        .bind(score.application_id)
        .bind(score.job_id)
        .bind(score.candidate_id)
        .bind(score.score)
        .bind(score.breakdown)
        .bind(score.explanation)
        .bind(score.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_job_match_score(&self, score: MatchScore) -> Result<MatchScore> {
        let row = sqlx::query_as::<_, MatchScore>(
            "INSERT INTO job_match_scores \
             (id, application_id, job_id, candidate_id, score, breakdown, explanation, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (job_id, candidate_id) DO UPDATE \
             SET score = EXCLUDED.score, breakdown = EXCLUDED.breakdown, \
                 explanation = EXCLUDED.explanation, updated_at = now() \
             RETURNING *",
        )
        .bind(score.id)
        .bind(score.application_id)
        .bind(score.job_id)
        .bind(score.candidate_id)
        .bind(score.score)
        .bind(score.breakdown)
        .bind(score.explanation)
        .bind(score.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_application_score(&self, application_id: Uuid) -> Result<Option<MatchScore>> {
        let row = sqlx::query_as::<_, MatchScore>(
            "SELECT * FROM application_scores WHERE application_id = $1",
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_job_match_score(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<MatchScore>> {
        let row = sqlx::query_as::<_, MatchScore>(
            "SELECT * FROM job_match_scores WHERE job_id = $1 AND candidate_id = $2",
        )
        .bind(job_id)
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, Job>(
            "SELECT id, org_id, title, description, keywords, required_experience \
             FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_candidate_profile(&self, candidate_id: Uuid) -> Result<Option<CandidateProfile>> {
        let row = sqlx::query_as::<_, CandidateProfile>(
            "SELECT candidate_id, skills, years_experience, keywords, resume_url \
             FROM candidate_profiles WHERE candidate_id = $1",
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_agency_profile(&self, org_id: Uuid) -> Result<Option<AgencyProfile>> {
        let row = sqlx::query_as::<_, AgencyProfile>(
            "SELECT org_id, name, conversion_rate FROM agency_profiles WHERE org_id = $1",
        )
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_job(&self, job: Job) -> Result<Job> {
        let row = sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (id, org_id, title, description, keywords, required_experience) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO UPDATE \
             SET org_id = EXCLUDED.org_id, title = EXCLUDED.title, \
                 description = EXCLUDED.description, keywords = EXCLUDED.keywords, \
                 required_experience = EXCLUDED.required_experience \
             RETURNING id, org_id, title, description, keywords, required_experience",
        )
        .bind(job.id)
        .bind(job.org_id)
        .bind(job.title)
        .bind(job.description)
        .bind(job.keywords)
        .bind(job.required_experience)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_candidate_profile(
        &self,
        profile: CandidateProfile,
    ) -> Result<CandidateProfile> {
        let row = sqlx::query_as::<_, CandidateProfile>(
            "INSERT INTO candidate_profiles \
             (candidate_id, skills, years_experience, keywords, resume_url) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (candidate_id) DO UPDATE \
             SET skills = EXCLUDED.skills, years_experience = EXCLUDED.years_experience, \
                 keywords = EXCLUDED.keywords, resume_url = EXCLUDED.resume_url \
             RETURNING candidate_id, skills, years_experience, keywords, resume_url",
        )
        .bind(profile.candidate_id)
        .bind(profile.skills)
        .bind(profile.years_experience)
        .bind(profile.keywords)
        .bind(profile.resume_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_agency_profile(&self, agency: AgencyProfile) -> Result<AgencyProfile> {
        let row = sqlx::query_as::<_, AgencyProfile>(
            "INSERT INTO agency_profiles (org_id, name, conversion_rate) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (org_id) DO UPDATE \
             SET name = EXCLUDED.name, conversion_rate = EXCLUDED.conversion_rate \
             RETURNING org_id, name, conversion_rate",
        )
        .bind(agency.org_id)
        .bind(agency.name)
        .bind(agency.conversion_rate)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
