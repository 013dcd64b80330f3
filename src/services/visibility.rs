use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::actor::{Actor, Role};
use crate::models::application::{Application, TechnicalStatus};

/// What an actor is allowed to see of an application. Technical reviewers
/// only receive the technical sub-track; everyone else either gets the
/// full record or nothing.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApplicationView {
    Full(Application),
    Technical(TechnicalView),
}

#[derive(Debug, Clone, Serialize)]
pub struct TechnicalView {
    pub application_id: Uuid,
    pub technical_status: Option<TechnicalStatus>,
    pub technical_score: Option<i32>,
    pub technical_feedback: Option<String>,
}

/// The visibility gate. Pure function of the actor, the application row
/// and the owning job's organization; evaluated on every read path and
/// never cached across role or org boundaries.
///
/// The load-bearing rule is two-level shortlisting: an employer must not
/// observe an agency-sourced application until the agency has shortlisted
/// it, while direct-hire applications are employer-visible from `applied`.
pub fn visible_view(
    actor: &Actor,
    application: &Application,
    job_org_id: Uuid,
) -> Result<ApplicationView> {
    let denied = || Error::forbidden(actor.id, format!("application {}", application.id));

    match actor.role {
        Role::Admin => Ok(ApplicationView::Full(application.clone())),
        Role::Candidate => {
            if application.candidate_id == actor.id {
                Ok(ApplicationView::Full(application.clone()))
            } else {
                Err(denied())
            }
        }
        Role::Agency => {
            if application.agency_id.is_some() && application.agency_id == actor.org_id {
                Ok(ApplicationView::Full(application.clone()))
            } else {
                Err(denied())
            }
        }
        Role::Employer => {
            if actor.org_id == Some(job_org_id) && application.employer_visible() {
                Ok(ApplicationView::Full(application.clone()))
            } else {
                Err(denied())
            }
        }
        Role::TechnicalReviewer => {
            if application.technical_reviewer_id == Some(actor.id) {
                Ok(ApplicationView::Technical(TechnicalView {
                    application_id: application.id,
                    technical_status: application.technical_status,
                    technical_score: application.technical_score,
                    technical_feedback: application.technical_feedback.clone(),
                }))
            } else {
                Err(denied())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationStatus;
    use chrono::Utc;

    fn application(status: ApplicationStatus, agency_id: Option<Uuid>) -> Application {
        Application {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            agency_id,
            submitted_by: None,
            status,
            technical_reviewer_id: None,
            technical_status: None,
            technical_score: None,
            technical_feedback: None,
            applied_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn employer_blind_to_agency_pool_until_shortlist() {
        let org = Uuid::new_v4();
        let agency = Uuid::new_v4();
        let employer = Actor::new(Uuid::new_v4(), Role::Employer, Some(org));

        let mut app = application(ApplicationStatus::Applied, Some(agency));
        assert!(visible_view(&employer, &app, org).is_err());

        app.status = ApplicationStatus::AgencyShortlisted;
        assert!(visible_view(&employer, &app, org).is_ok());
    }

    #[test]
    fn employer_sees_direct_hire_from_applied() {
        let org = Uuid::new_v4();
        let employer = Actor::new(Uuid::new_v4(), Role::Employer, Some(org));
        let app = application(ApplicationStatus::Applied, None);
        assert!(visible_view(&employer, &app, org).is_ok());
    }

    #[test]
    fn employer_of_other_org_denied() {
        let employer = Actor::new(Uuid::new_v4(), Role::Employer, Some(Uuid::new_v4()));
        let app = application(ApplicationStatus::EmployerReview, None);
        assert!(visible_view(&employer, &app, Uuid::new_v4()).is_err());
    }

    #[test]
    fn agency_keeps_access_downstream() {
        let agency_org = Uuid::new_v4();
        let agency = Actor::new(Uuid::new_v4(), Role::Agency, Some(agency_org));
        let app = application(ApplicationStatus::Hired, Some(agency_org));
        assert!(visible_view(&agency, &app, Uuid::new_v4()).is_ok());

        let other = Actor::new(Uuid::new_v4(), Role::Agency, Some(Uuid::new_v4()));
        assert!(visible_view(&other, &app, Uuid::new_v4()).is_err());
    }

    #[test]
    fn candidate_reads_own_rows_only() {
        let app = application(ApplicationStatus::Applied, None);
        let owner = Actor::new(app.candidate_id, Role::Candidate, None);
        let stranger = Actor::new(Uuid::new_v4(), Role::Candidate, None);
        assert!(visible_view(&owner, &app, Uuid::new_v4()).is_ok());
        assert!(visible_view(&stranger, &app, Uuid::new_v4()).is_err());
    }

    #[test]
    fn reviewer_gets_technical_fields_only() {
        let reviewer_id = Uuid::new_v4();
        let mut app = application(ApplicationStatus::EmployerReview, None);
        let reviewer = Actor::new(reviewer_id, Role::TechnicalReviewer, None);
        assert!(visible_view(&reviewer, &app, Uuid::new_v4()).is_err());

        app.technical_reviewer_id = Some(reviewer_id);
        app.technical_score = Some(4);
        match visible_view(&reviewer, &app, Uuid::new_v4()).unwrap() {
            ApplicationView::Technical(view) => {
                assert_eq!(view.application_id, app.id);
                assert_eq!(view.technical_score, Some(4));
            }
            ApplicationView::Full(_) => panic!("reviewer must not see the full record"),
        }
    }

    #[test]
    fn admin_bypasses_every_filter() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin, None);
        let app = application(ApplicationStatus::Applied, Some(Uuid::new_v4()));
        assert!(visible_view(&admin, &app, Uuid::new_v4()).is_ok());
    }
}
