use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored match score. Either application-scoped (`application_id` set)
/// or exploratory (`job_id` + `candidate_id` set). The breakdown column
/// holds the strategy-specific sub-scores as JSON and is only ever
/// replaced wholesale on recomputation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchScore {
    pub id: Uuid,
    pub application_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub candidate_id: Option<Uuid>,
    pub score: i32,
    pub breakdown: JsonValue,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Breakdown for the employer-facing application score.
/// Caps: skills 40, experience 30, agency 20, interview 10.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationBreakdown {
    pub skills_match: i32,
    pub experience_match: i32,
    pub agency_score: i32,
    pub interview_score: i32,
}

impl ApplicationBreakdown {
    pub fn total(&self) -> i32 {
        self.skills_match + self.experience_match + self.agency_score + self.interview_score
    }
}

/// Breakdown for the candidate-facing exploratory job match.
/// Caps: skills 40, experience 30, keywords 30. The matched lists are
/// carried for UI highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMatchBreakdown {
    pub skills_score: i32,
    pub experience_score: i32,
    pub keyword_score: i32,
    pub matched_skills: Vec<String>,
    pub matched_keywords: Vec<String>,
}

impl JobMatchBreakdown {
    pub fn total(&self) -> i32 {
        self.skills_score + self.experience_score + self.keyword_score
    }
}
