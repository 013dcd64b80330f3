use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pipeline status of an application. The numeric stage is only used for
/// progress rendering; transition legality is governed by
/// [`ApplicationStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    AgencyShortlisted,
    EmployerReview,
    TechnicalApproved,
    InterviewScheduled,
    InterviewCompleted,
    OfferSent,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::AgencyShortlisted => "agency_shortlisted",
            ApplicationStatus::EmployerReview => "employer_review",
            ApplicationStatus::TechnicalApproved => "technical_approved",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::InterviewCompleted => "interview_completed",
            ApplicationStatus::OfferSent => "offer_sent",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Stage number shown on progress bars. `rejected` carries no stage.
    pub fn stage_order(&self) -> u8 {
        match self {
            ApplicationStatus::Applied => 1,
            ApplicationStatus::AgencyShortlisted => 2,
            ApplicationStatus::EmployerReview => 3,
            ApplicationStatus::TechnicalApproved => 4,
            ApplicationStatus::InterviewScheduled | ApplicationStatus::InterviewCompleted => 5,
            ApplicationStatus::OfferSent => 6,
            ApplicationStatus::Hired => 7,
            ApplicationStatus::Rejected => 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Hired | ApplicationStatus::Rejected)
    }

    /// Forward edges of the pipeline graph. `rejected` is reachable from
    /// every non-terminal status; terminal states have no outgoing edges.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        if self.is_terminal() {
            return false;
        }
        if next == Rejected {
            return true;
        }
        match (self, next) {
            (Applied, AgencyShortlisted) => true,
            (Applied, EmployerReview) => true,
            (AgencyShortlisted, EmployerReview) => true,
            (EmployerReview, TechnicalApproved) => true,
            (EmployerReview, InterviewScheduled) => true,
            (TechnicalApproved, InterviewScheduled) => true,
            (InterviewScheduled, InterviewCompleted) => true,
            // further rounds after a completed one
            (InterviewCompleted, InterviewScheduled) => true,
            (EmployerReview, OfferSent) => true,
            (TechnicalApproved, OfferSent) => true,
            (InterviewScheduled, OfferSent) => true,
            (InterviewCompleted, OfferSent) => true,
            (OfferSent, Hired) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the orthogonal technical review sub-track. Independent of
/// the pipeline `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "technical_status", rename_all = "snake_case")]
pub enum TechnicalStatus {
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub agency_id: Option<Uuid>,
    pub submitted_by: Option<Uuid>,
    pub status: ApplicationStatus,
    pub technical_reviewer_id: Option<Uuid>,
    pub technical_status: Option<TechnicalStatus>,
    pub technical_score: Option<i32>,
    pub technical_feedback: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Application {
    /// Agency-led applications stay in the agency's private pool until
    /// shortlisted; direct-hire applications are employer-visible from
    /// `applied` onward.
    pub fn is_agency_sourced(&self) -> bool {
        self.agency_id.is_some()
    }

    pub fn employer_visible(&self) -> bool {
        !(self.is_agency_sourced() && self.status == ApplicationStatus::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_reachable_from_any_non_terminal() {
        use ApplicationStatus::*;
        for s in [
            Applied,
            AgencyShortlisted,
            EmployerReview,
            TechnicalApproved,
            InterviewScheduled,
            InterviewCompleted,
            OfferSent,
        ] {
            assert!(s.can_transition_to(Rejected), "{s} -> rejected");
        }
        assert!(!Hired.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Rejected));
    }

    #[test]
    fn no_backward_or_skipping_edges() {
        use ApplicationStatus::*;
        assert!(!AgencyShortlisted.can_transition_to(Applied));
        assert!(!Applied.can_transition_to(OfferSent));
        assert!(!Applied.can_transition_to(Hired));
        assert!(!EmployerReview.can_transition_to(AgencyShortlisted));
        assert!(!Hired.can_transition_to(OfferSent));
    }

    #[test]
    fn hired_only_from_offer_sent() {
        use ApplicationStatus::*;
        for s in [
            Applied,
            AgencyShortlisted,
            EmployerReview,
            TechnicalApproved,
            InterviewScheduled,
            InterviewCompleted,
        ] {
            assert!(!s.can_transition_to(Hired));
        }
        assert!(OfferSent.can_transition_to(Hired));
    }

    #[test]
    fn interview_stages_share_progress_order() {
        assert_eq!(
            ApplicationStatus::InterviewScheduled.stage_order(),
            ApplicationStatus::InterviewCompleted.stage_order()
        );
        assert_eq!(ApplicationStatus::Hired.stage_order(), 7);
    }
}
