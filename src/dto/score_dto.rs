use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::models::score::MatchScore;
use crate::services::scoring_service::ScoreCalculator;

/// A stored score plus its bucketed label. The label table differs by
/// strategy, so the caller picks the right constructor.
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub id: Uuid,
    pub application_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub candidate_id: Option<Uuid>,
    pub score: i32,
    pub label: &'static str,
    pub breakdown: JsonValue,
    pub explanation: Option<String>,
}

impl ScoreResponse {
    pub fn application(score: MatchScore) -> Self {
        let label = ScoreCalculator::application_score_label(score.score);
        Self::build(score, label)
    }

    pub fn job_match(score: MatchScore) -> Self {
        let label = ScoreCalculator::job_match_label(score.score);
        Self::build(score, label)
    }

    fn build(score: MatchScore, label: &'static str) -> Self {
        Self {
            id: score.id,
            application_id: score.application_id,
            job_id: score.job_id,
            candidate_id: score.candidate_id,
            score: score.score,
            label,
            breakdown: score.breakdown,
            explanation: score.explanation,
        }
    }
}
