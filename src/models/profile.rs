use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Candidate-owned profile record. Read-only to the matching engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateProfile {
    pub candidate_id: Uuid,
    pub skills: Vec<String>,
    pub years_experience: i32,
    pub keywords: Vec<String>,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub org_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub required_experience: i32,
}

/// Aggregate track record of a recruiting agency; the conversion rate
/// feeds the agency sub-score.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AgencyProfile {
    pub org_id: Uuid,
    pub name: String,
    pub conversion_rate: f64,
}
