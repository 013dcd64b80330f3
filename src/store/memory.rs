use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, TechnicalStatus};
use crate::models::interview::{Interview, InterviewStatus};
use crate::models::offer::{Offer, OfferStatus};
use crate::models::profile::{AgencyProfile, CandidateProfile, Job};
use crate::models::score::MatchScore;

use super::Store;

#[derive(Debug, Default)]
struct Inner {
    applications: HashMap<Uuid, Application>,
    interviews: HashMap<Uuid, Interview>,
    offers: HashMap<Uuid, Offer>,
    application_scores: HashMap<Uuid, MatchScore>,
    job_match_scores: HashMap<(Uuid, Uuid), MatchScore>,
    jobs: HashMap<Uuid, Job>,
    candidate_profiles: HashMap<Uuid, CandidateProfile>,
    agency_profiles: HashMap<Uuid, AgencyProfile>,
}

/// In-memory store backing tests and local development. Same contract as
/// the Postgres store, including the duplicate-key and conditional-write
/// semantics.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store mutex poisoned")
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_application(&self, application: Application) -> Result<Application> {
        let mut inner = self.lock();
        let duplicate = inner.applications.values().any(|a| {
            a.job_id == application.job_id && a.candidate_id == application.candidate_id
        });
        if duplicate {
            return Err(Error::DuplicateApplication {
                job_id: application.job_id,
                candidate_id: application.candidate_id,
            });
        }
        inner
            .applications
            .insert(application.id, application.clone());
        Ok(application)
    }

    async fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        Ok(self.lock().applications.get(&id).cloned())
    }

    async fn find_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<Application>> {
        Ok(self
            .lock()
            .applications
            .values()
            .find(|a| a.job_id == job_id && a.candidate_id == candidate_id)
            .cloned())
    }

    async fn compare_and_set_status(
        &self,
        id: Uuid,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let mut inner = self.lock();
        match inner.applications.get_mut(&id) {
            Some(app) if app.status == expected => {
                app.status = next;
                app.updated_at = Some(Utc::now());
                Ok(Some(app.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn set_technical_review(
        &self,
        id: Uuid,
        status: TechnicalStatus,
        score: i32,
        feedback: String,
    ) -> Result<Option<Application>> {
        let mut inner = self.lock();
        match inner.applications.get_mut(&id) {
            Some(app) => {
                app.technical_status = Some(status);
                app.technical_score = Some(score);
                app.technical_feedback = Some(feedback);
                app.updated_at = Some(Utc::now());
                Ok(Some(app.clone()))
            }
            None => Ok(None),
        }
    }

    async fn assign_technical_reviewer(
        &self,
        id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Option<Application>> {
        let mut inner = self.lock();
        match inner.applications.get_mut(&id) {
            Some(app) => {
                app.technical_reviewer_id = Some(reviewer_id);
                app.updated_at = Some(Utc::now());
                Ok(Some(app.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list_applications_for_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        let mut rows: Vec<Application> = self
            .lock()
            .applications
            .values()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.applied_at);
        Ok(rows)
    }

    async fn list_applications_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<Application>> {
        let mut rows: Vec<Application> = self
            .lock()
            .applications
            .values()
            .filter(|a| a.candidate_id == candidate_id)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.applied_at);
        Ok(rows)
    }

    async fn list_applications_for_agency(&self, agency_id: Uuid) -> Result<Vec<Application>> {
        let mut rows: Vec<Application> = self
            .lock()
            .applications
            .values()
            .filter(|a| a.agency_id == Some(agency_id))
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.applied_at);
        Ok(rows)
    }

    async fn insert_interview(&self, interview: Interview) -> Result<Interview> {
        self.lock().interviews.insert(interview.id, interview.clone());
        Ok(interview)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>> {
        Ok(self.lock().interviews.get(&id).cloned())
    }

    async fn close_interview(
        &self,
        id: Uuid,
        status: InterviewStatus,
        feedback: Option<String>,
        passed: Option<bool>,
    ) -> Result<Option<Interview>> {
        let mut inner = self.lock();
        match inner.interviews.get_mut(&id) {
            Some(interview) if interview.status == InterviewStatus::Scheduled => {
                interview.status = status;
                interview.feedback = feedback;
                interview.passed = passed;
                interview.updated_at = Some(Utc::now());
                Ok(Some(interview.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn latest_interview(&self, application_id: Uuid) -> Result<Option<Interview>> {
        Ok(self
            .lock()
            .interviews
            .values()
            .filter(|i| i.application_id == application_id)
            .max_by_key(|i| i.scheduled_at)
            .cloned())
    }

    async fn insert_offer(&self, offer: Offer) -> Result<Offer> {
        self.lock().offers.insert(offer.id, offer.clone());
        Ok(offer)
    }

    async fn get_offer(&self, id: Uuid) -> Result<Option<Offer>> {
        Ok(self.lock().offers.get(&id).cloned())
    }

    async fn find_offer_by_status(
        &self,
        application_id: Uuid,
        status: OfferStatus,
    ) -> Result<Option<Offer>> {
        Ok(self
            .lock()
            .offers
            .values()
            .find(|o| o.application_id == application_id && o.status == status)
            .cloned())
    }

    async fn close_offer(
        &self,
        id: Uuid,
        status: OfferStatus,
        responded_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Offer>> {
        let mut inner = self.lock();
        match inner.offers.get_mut(&id) {
            Some(offer) if offer.status == OfferStatus::Sent => {
                offer.status = status;
                if offer.responded_at.is_none() {
                    offer.responded_at = responded_at;
                }
                Ok(Some(offer.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn upsert_application_score(&self, score: MatchScore) -> Result<MatchScore> {
        let application_id = score
            .application_id
            .ok_or_else(|| Error::Internal("application score without application_id".into()))?;
        let mut inner = self.lock();
        let stored = match inner.application_scores.get(&application_id) {
            Some(existing) => MatchScore {
                id: existing.id,
                created_at: existing.created_at,
                updated_at: Some(Utc::now()),
                ..score
            },
            None => score,
        };
        inner.application_scores.insert(application_id, stored.clone());
        Ok(stored)
    }

    async fn upsert_job_match_score(&self, score: MatchScore) -> Result<MatchScore> {
        let key = match (score.job_id, score.candidate_id) {
            (Some(j), Some(c)) => (j, c),
            _ => {
                return Err(Error::Internal(
                    "job match score without job_id/candidate_id".into(),
                ))
            }
        };
        let mut inner = self.lock();
        let stored = match inner.job_match_scores.get(&key) {
            Some(existing) => MatchScore {
                id: existing.id,
                created_at: existing.created_at,
                updated_at: Some(Utc::now()),
                ..score
            },
            None => score,
        };
        inner.job_match_scores.insert(key, stored.clone());
        Ok(stored)
    }

    async fn get_application_score(&self, application_id: Uuid) -> Result<Option<MatchScore>> {
        Ok(self.lock().application_scores.get(&application_id).cloned())
    }

    async fn get_job_match_score(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<MatchScore>> {
        Ok(self
            .lock()
            .job_match_scores
            .get(&(job_id, candidate_id))
            .cloned())
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.lock().jobs.get(&id).cloned())
    }

    async fn get_candidate_profile(&self, candidate_id: Uuid) -> Result<Option<CandidateProfile>> {
        Ok(self.lock().candidate_profiles.get(&candidate_id).cloned())
    }

    async fn get_agency_profile(&self, org_id: Uuid) -> Result<Option<AgencyProfile>> {
        Ok(self.lock().agency_profiles.get(&org_id).cloned())
    }

    async fn upsert_job(&self, job: Job) -> Result<Job> {
        self.lock().jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn upsert_candidate_profile(
        &self,
        profile: CandidateProfile,
    ) -> Result<CandidateProfile> {
        self.lock()
            .candidate_profiles
            .insert(profile.candidate_id, profile.clone());
        Ok(profile)
    }

    async fn upsert_agency_profile(&self, agency: AgencyProfile) -> Result<AgencyProfile> {
        self.lock().agency_profiles.insert(agency.org_id, agency.clone());
        Ok(agency)
    }
}
