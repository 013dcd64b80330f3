use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::{Application, TechnicalStatus};
use crate::models::interview::{InterviewRound, InterviewStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct ApplyPayload {
    pub job_id: Uuid,
    /// Required for agency submissions; candidates apply as themselves.
    pub candidate_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignReviewerPayload {
    pub reviewer_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TechnicalReviewPayload {
    #[validate(range(min = 0, max = 5))]
    pub score: i32,
    #[validate(length(min = 1))]
    pub feedback: String,
    pub decision: TechnicalStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleInterviewPayload {
    pub round: InterviewRound,
    pub scheduled_at: DateTime<Utc>,
    pub interviewer_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InterviewFeedbackPayload {
    pub status: InterviewStatus,
    pub feedback: Option<String>,
    pub passed: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOfferPayload {
    pub salary: Decimal,
    #[validate(length(min = 1))]
    pub currency: String,
    pub start_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OfferResponsePayload {
    pub accepted: bool,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    #[serde(flatten)]
    pub application: Application,
    /// 1-based progress stage for UI rendering; 0 for rejected.
    pub stage: u8,
}

impl From<Application> for ApplicationResponse {
    fn from(application: Application) -> Self {
        let stage = application.status.stage_order();
        Self { application, stage }
    }
}
