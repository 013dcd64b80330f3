use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::actor::{Actor, Role};
use crate::models::application::{Application, ApplicationStatus, TechnicalStatus};
use crate::models::interview::{Interview, InterviewRound, InterviewStatus};
use crate::models::offer::{Offer, OfferStatus};
use crate::models::profile::Job;
use crate::store::Store;

/// All pipeline transitions, including the interview and offer sub-flows.
/// Legality is always checked against freshly read state, and the actual
/// status write is a conditional update, so concurrent callers cannot
/// drive an application along an illegal edge.
#[derive(Clone)]
pub struct PipelineService {
    store: Arc<dyn Store>,
}

impl PipelineService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create an application in `applied`. Candidates apply for
    /// themselves; agencies submit a candidate out of their own pool and
    /// are stamped as `agency_id`/`submitted_by`.
    pub async fn apply(
        &self,
        actor: &Actor,
        job_id: Uuid,
        candidate_id: Option<Uuid>,
    ) -> Result<Application> {
        let job = self.job(job_id).await?;

        let (candidate_id, agency_id, submitted_by) = match actor.role {
            Role::Candidate => (actor.id, None, None),
            Role::Agency => {
                let org_id = actor
                    .org_id
                    .ok_or_else(|| Error::forbidden(actor.id, "agency submission without org"))?;
                let candidate_id = candidate_id.ok_or_else(|| {
                    Error::BadRequest("candidate_id is required for agency submissions".into())
                })?;
                (candidate_id, Some(org_id), Some(actor.id))
            }
            Role::Admin => {
                let candidate_id = candidate_id.ok_or_else(|| {
                    Error::BadRequest("candidate_id is required".into())
                })?;
                (candidate_id, None, None)
            }
            _ => return Err(Error::forbidden(actor.id, format!("apply to job {}", job.id))),
        };

        let application = Application {
            id: Uuid::new_v4(),
            job_id,
            candidate_id,
            agency_id,
            submitted_by,
            status: ApplicationStatus::Applied,
            technical_reviewer_id: None,
            technical_status: None,
            technical_score: None,
            technical_feedback: None,
            applied_at: Utc::now(),
            updated_at: None,
        };
        let stored = self.store.insert_application(application).await?;
        tracing::info!(
            application_id = %stored.id,
            job_id = %job_id,
            candidate_id = %candidate_id,
            agency_led = stored.agency_id.is_some(),
            "application created"
        );
        Ok(stored)
    }

    /// Agency promotes an application out of its private pool. After this
    /// the owning employer's reads include the row.
    pub async fn shortlist(&self, actor: &Actor, application_id: Uuid) -> Result<Application> {
        let application = self.application(application_id).await?;
        self.ensure_agency(actor, &application)?;

        if application.agency_id.is_none() {
            return Err(Error::invalid_transition(application.status, "shortlist"));
        }
        self.transition(
            application_id,
            ApplicationStatus::Applied,
            ApplicationStatus::AgencyShortlisted,
            "shortlist",
        )
        .await
    }

    /// Employer pulls an application into review: from `applied` for
    /// direct-hire, from `agency_shortlisted` for agency-led.
    pub async fn advance_to_review(
        &self,
        actor: &Actor,
        application_id: Uuid,
    ) -> Result<Application> {
        let application = self.application(application_id).await?;
        let job = self.job(application.job_id).await?;
        ensure_employer(actor, &job)?;

        let expected = if application.is_agency_sourced() {
            ApplicationStatus::AgencyShortlisted
        } else {
            ApplicationStatus::Applied
        };
        self.transition(
            application_id,
            expected,
            ApplicationStatus::EmployerReview,
            "advance_to_review",
        )
        .await
    }

    /// Employer marks the technical gate as passed on the main track.
    pub async fn approve_technical(
        &self,
        actor: &Actor,
        application_id: Uuid,
    ) -> Result<Application> {
        let application = self.application(application_id).await?;
        let job = self.job(application.job_id).await?;
        ensure_employer(actor, &job)?;

        self.transition(
            application_id,
            ApplicationStatus::EmployerReview,
            ApplicationStatus::TechnicalApproved,
            "approve_technical",
        )
        .await
    }

    /// Absorbing transition. Idempotent: rejecting an already rejected
    /// application is a no-op, matching the unconditional overwrite in
    /// the product's workflow.
    pub async fn reject(&self, actor: &Actor, application_id: Uuid) -> Result<Application> {
        // CAS loop: re-read, re-check, retry if a concurrent transition
        // moved the status under us.
        for _ in 0..3 {
            let application = self.application(application_id).await?;
            let job = self.job(application.job_id).await?;
            ensure_rejecter(actor, &application, &job)?;

            match application.status {
                ApplicationStatus::Rejected => return Ok(application),
                ApplicationStatus::Hired => {
                    return Err(Error::invalid_transition(ApplicationStatus::Hired, "reject"))
                }
                current => {
                    if let Some(updated) = self
                        .store
                        .compare_and_set_status(
                            application_id,
                            current,
                            ApplicationStatus::Rejected,
                        )
                        .await?
                    {
                        tracing::info!(application_id = %application_id, from = %current, "application rejected");
                        return Ok(updated);
                    }
                }
            }
        }
        Err(Error::StoreUnavailable(
            "application status kept changing concurrently".into(),
        ))
    }

    /// Legal only once an offer on this application has been accepted.
    pub async fn mark_hired(&self, actor: &Actor, application_id: Uuid) -> Result<Application> {
        let application = self.application(application_id).await?;
        let job = self.job(application.job_id).await?;
        ensure_employer(actor, &job)?;

        let accepted = self
            .store
            .find_offer_by_status(application_id, OfferStatus::Accepted)
            .await?;
        if accepted.is_none() {
            return Err(Error::invalid_transition(application.status, "mark_hired"));
        }
        self.transition(
            application_id,
            ApplicationStatus::OfferSent,
            ApplicationStatus::Hired,
            "mark_hired",
        )
        .await
    }

    pub async fn assign_technical_reviewer(
        &self,
        actor: &Actor,
        application_id: Uuid,
        reviewer_id: Uuid,
    ) -> Result<Application> {
        let application = self.application(application_id).await?;
        let job = self.job(application.job_id).await?;
        ensure_employer(actor, &job)?;

        self.store
            .assign_technical_reviewer(application_id, reviewer_id)
            .await?
            .ok_or_else(|| Error::not_found("Application", application_id))
    }

    /// Orthogonal technical sub-track: writes `technical_*` fields only,
    /// never the pipeline status. Only the assigned reviewer may submit.
    pub async fn submit_technical_review(
        &self,
        actor: &Actor,
        application_id: Uuid,
        score: i32,
        feedback: String,
        decision: TechnicalStatus,
    ) -> Result<Application> {
        let application = self.application(application_id).await?;
        if application.technical_reviewer_id != Some(actor.id) {
            return Err(Error::forbidden(
                actor.id,
                format!("technical review of application {}", application_id),
            ));
        }
        if !(0..=5).contains(&score) {
            return Err(Error::BadRequest(
                "technical score must be between 0 and 5".into(),
            ));
        }

        let updated = self
            .store
            .set_technical_review(application_id, decision, score, feedback)
            .await?
            .ok_or_else(|| Error::not_found("Application", application_id))?;
        tracing::info!(
            application_id = %application_id,
            reviewer_id = %actor.id,
            decision = ?decision,
            "technical review submitted"
        );
        Ok(updated)
    }

    /// Employer-side scheduling; advances the main track to
    /// `interview_scheduled` unless it is already there.
    pub async fn schedule_interview(
        &self,
        actor: &Actor,
        application_id: Uuid,
        round: InterviewRound,
        scheduled_at: DateTime<Utc>,
        interviewer_id: Option<Uuid>,
    ) -> Result<Interview> {
        let application = self.application(application_id).await?;
        let job = self.job(application.job_id).await?;
        ensure_employer(actor, &job)?;

        use ApplicationStatus::*;
        if !matches!(
            application.status,
            EmployerReview | TechnicalApproved | InterviewScheduled | InterviewCompleted
        ) {
            return Err(Error::invalid_transition(application.status, "schedule_interview"));
        }

        let interview = Interview {
            id: Uuid::new_v4(),
            application_id,
            round,
            scheduled_at,
            interviewer_id,
            status: InterviewStatus::Scheduled,
            feedback: None,
            passed: None,
            created_by: actor.id,
            created_at: Utc::now(),
            updated_at: None,
        };
        let stored = self.store.insert_interview(interview).await?;

        if application.status != InterviewScheduled {
            self.transition(
                application_id,
                application.status,
                InterviewScheduled,
                "schedule_interview",
            )
            .await?;
        }
        tracing::info!(interview_id = %stored.id, application_id = %application_id, round = ?round, "interview scheduled");
        Ok(stored)
    }

    /// Close a scheduled interview. Completion requires non-empty
    /// feedback from the assigned interviewer; cancellation needs
    /// neither. A closed interview is immutable.
    pub async fn submit_interview_feedback(
        &self,
        actor: &Actor,
        interview_id: Uuid,
        outcome: InterviewStatus,
        feedback: Option<String>,
        passed: Option<bool>,
    ) -> Result<Interview> {
        let interview = self
            .store
            .get_interview(interview_id)
            .await?
            .ok_or_else(|| Error::not_found("Interview", interview_id))?;
        let application = self.application(interview.application_id).await?;
        let job = self.job(application.job_id).await?;

        match outcome {
            InterviewStatus::Completed => {
                let allowed = match interview.interviewer_id {
                    Some(interviewer) => actor.id == interviewer || actor.role == Role::Admin,
                    None => ensure_employer(actor, &job).is_ok(),
                };
                if !allowed {
                    return Err(Error::forbidden(
                        actor.id,
                        format!("interview {}", interview_id),
                    ));
                }
                if feedback.as_deref().map_or(true, |f| f.trim().is_empty()) {
                    return Err(Error::BadRequest(
                        "feedback is required to complete an interview".into(),
                    ));
                }
            }
            InterviewStatus::Cancelled => {
                let is_scheduler = actor.id == interview.created_by;
                let is_interviewer = interview.interviewer_id == Some(actor.id);
                if !is_scheduler && !is_interviewer && ensure_employer(actor, &job).is_err() {
                    return Err(Error::forbidden(
                        actor.id,
                        format!("interview {}", interview_id),
                    ));
                }
            }
            InterviewStatus::Scheduled => {
                return Err(Error::BadRequest(
                    "an interview can only be closed as completed or cancelled".into(),
                ))
            }
        }

        let closed = self
            .store
            .close_interview(interview_id, outcome, feedback, passed)
            .await?
            .ok_or_else(|| Error::invalid_transition(interview.status, "close_interview"))?;

        if outcome == InterviewStatus::Completed {
            // advisory main-track advance; a concurrent transition wins
            let _ = self
                .store
                .compare_and_set_status(
                    application.id,
                    ApplicationStatus::InterviewScheduled,
                    ApplicationStatus::InterviewCompleted,
                )
                .await?;
        }
        tracing::info!(interview_id = %interview_id, outcome = ?outcome, "interview closed");
        Ok(closed)
    }

    pub async fn cancel_interview(&self, actor: &Actor, interview_id: Uuid) -> Result<Interview> {
        self.submit_interview_feedback(actor, interview_id, InterviewStatus::Cancelled, None, None)
            .await
    }

    /// One live `sent` offer per application: a fresh read guards the
    /// insert, so a second offer while one is pending is refused.
    pub async fn create_offer(
        &self,
        actor: &Actor,
        application_id: Uuid,
        salary: Decimal,
        currency: String,
        start_date: NaiveDate,
    ) -> Result<Offer> {
        let application = self.application(application_id).await?;
        let job = self.job(application.job_id).await?;
        ensure_employer(actor, &job)?;

        if salary <= Decimal::ZERO {
            return Err(Error::BadRequest("salary must be positive".into()));
        }

        use ApplicationStatus::*;
        if !matches!(
            application.status,
            EmployerReview | TechnicalApproved | InterviewScheduled | InterviewCompleted | OfferSent
        ) {
            return Err(Error::invalid_transition(application.status, "create_offer"));
        }

        if self
            .store
            .find_offer_by_status(application_id, OfferStatus::Sent)
            .await?
            .is_some()
        {
            return Err(Error::invalid_transition(application.status, "create_offer"));
        }

        let offer = Offer {
            id: Uuid::new_v4(),
            application_id,
            salary,
            currency,
            start_date,
            status: OfferStatus::Sent,
            sent_at: Utc::now(),
            responded_at: None,
            created_by: actor.id,
        };
        let stored = self.store.insert_offer(offer).await?;

        if application.status != OfferSent {
            self.transition(application_id, application.status, OfferSent, "create_offer")
                .await?;
        }
        tracing::info!(offer_id = %stored.id, application_id = %application_id, "offer sent");
        Ok(stored)
    }

    /// Candidate accepts or declines. `responded_at` is written exactly
    /// once, by the conditional close out of `sent`.
    pub async fn respond_to_offer(
        &self,
        actor: &Actor,
        offer_id: Uuid,
        accepted: bool,
    ) -> Result<Offer> {
        let offer = self
            .store
            .get_offer(offer_id)
            .await?
            .ok_or_else(|| Error::not_found("Offer", offer_id))?;
        let application = self.application(offer.application_id).await?;

        let is_candidate = actor.role == Role::Candidate && actor.id == application.candidate_id;
        if !is_candidate && actor.role != Role::Admin {
            return Err(Error::forbidden(actor.id, format!("offer {}", offer_id)));
        }

        let next = if accepted {
            OfferStatus::Accepted
        } else {
            OfferStatus::Declined
        };
        let closed = self
            .store
            .close_offer(offer_id, next, Some(Utc::now()))
            .await?
            .ok_or_else(|| Error::invalid_transition(offer.status, "respond_to_offer"))?;
        tracing::info!(offer_id = %offer_id, accepted, "offer response recorded");
        Ok(closed)
    }

    pub async fn expire_offer(&self, actor: &Actor, offer_id: Uuid) -> Result<Offer> {
        let offer = self
            .store
            .get_offer(offer_id)
            .await?
            .ok_or_else(|| Error::not_found("Offer", offer_id))?;
        let application = self.application(offer.application_id).await?;
        let job = self.job(application.job_id).await?;
        ensure_employer(actor, &job)?;

        self.store
            .close_offer(offer_id, OfferStatus::Expired, None)
            .await?
            .ok_or_else(|| Error::invalid_transition(offer.status, "expire_offer"))
    }

    async fn application(&self, id: Uuid) -> Result<Application> {
        self.store
            .get_application(id)
            .await?
            .ok_or_else(|| Error::not_found("Application", id))
    }

    async fn job(&self, id: Uuid) -> Result<Job> {
        self.store
            .get_job(id)
            .await?
            .ok_or_else(|| Error::not_found("Job", id))
    }

    /// Conditional status write. On a miss the application is re-read and
    /// the violation is reported against the fresh state, never a cached
    /// one.
    async fn transition(
        &self,
        id: Uuid,
        expected: ApplicationStatus,
        next: ApplicationStatus,
        attempted: &'static str,
    ) -> Result<Application> {
        if !expected.can_transition_to(next) {
            return Err(Error::invalid_transition(expected, attempted));
        }
        match self.store.compare_and_set_status(id, expected, next).await? {
            Some(updated) => {
                tracing::info!(application_id = %id, from = %expected, to = %next, "pipeline transition");
                Ok(updated)
            }
            None => {
                let fresh = self.application(id).await?;
                Err(Error::invalid_transition(fresh.status, attempted))
            }
        }
    }

    fn ensure_agency(&self, actor: &Actor, application: &Application) -> Result<()> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Agency
                if application.agency_id.is_some()
                    && application.agency_id == actor.org_id =>
            {
                Ok(())
            }
            _ => Err(Error::forbidden(
                actor.id,
                format!("application {}", application.id),
            )),
        }
    }
}

fn ensure_employer(actor: &Actor, job: &Job) -> Result<()> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Employer if actor.org_id == Some(job.org_id) => Ok(()),
        _ => Err(Error::forbidden(actor.id, format!("job {}", job.id))),
    }
}

/// Reject is shared between the employer of the owning org, the
/// submitting agency, and admins.
fn ensure_rejecter(actor: &Actor, application: &Application, job: &Job) -> Result<()> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Employer if actor.org_id == Some(job.org_id) => Ok(()),
        Role::Agency
            if application.agency_id.is_some() && application.agency_id == actor.org_id =>
        {
            Ok(())
        }
        _ => Err(Error::forbidden(
            actor.id,
            format!("application {}", application.id),
        )),
    }
}
