use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::interview::{Interview, InterviewStatus};
use crate::models::profile::{AgencyProfile, CandidateProfile, Job};
use crate::models::score::{ApplicationBreakdown, JobMatchBreakdown, MatchScore};
use crate::store::Store;

/// Pure, deterministic score calculator. No I/O: the service below feeds
/// it whatever snapshot of profile/job/agency/interview state exists at
/// call time. Missing inputs degrade the affected sub-score to zero
/// instead of failing the computation.
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Employer-facing application score.
    /// Weights: skills 40, experience 30, agency 20, interview 10.
    pub fn application_breakdown(
        profile: &CandidateProfile,
        job: &Job,
        agency: Option<&AgencyProfile>,
        last_interview: Option<&Interview>,
    ) -> ApplicationBreakdown {
        let matched = profile
            .skills
            .iter()
            .filter(|skill| {
                let skill = skill.to_lowercase();
                !skill.is_empty()
                    && job.keywords.iter().any(|keyword| {
                        let keyword = keyword.to_lowercase();
                        !keyword.is_empty()
                            && (skill.contains(&keyword) || keyword.contains(&skill))
                    })
            })
            .count();
        let skills_match =
            ((matched as f64 / job.keywords.len().max(1) as f64) * 40.0).round() as i32;

        let delta = (profile.years_experience - job.required_experience).abs();
        let experience_match = if delta == 0 { 30 } else { (30 - 5 * delta).max(0) };

        let agency_score = agency
            .map(|a| ((a.conversion_rate * 0.2).round() as i32).clamp(0, 20))
            .unwrap_or(0);

        let interview_score = match last_interview {
            Some(i) if i.status == InterviewStatus::Completed && i.passed == Some(true) => 10,
            _ => 0,
        };

        ApplicationBreakdown {
            skills_match: skills_match.min(40),
            experience_match,
            agency_score,
            interview_score,
        }
    }

    /// Candidate-facing exploratory match against the job description.
    /// Weights: skills 40 (10 per hit), experience tiers 30, keywords 30
    /// (10 per hit).
    pub fn job_match_breakdown(profile: &CandidateProfile, job: &Job) -> JobMatchBreakdown {
        let description = job
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        let matched_skills: Vec<String> = profile
            .skills
            .iter()
            .filter(|s| !s.is_empty() && description.contains(&s.to_lowercase()))
            .cloned()
            .collect();
        let skills_score = (matched_skills.len() as i32 * 10).min(40);

        let experience_score = match profile.years_experience {
            y if y >= 5 => 30,
            y if y >= 3 => 25,
            y if y >= 1 => 15,
            _ => 5,
        };

        let matched_keywords: Vec<String> = profile
            .keywords
            .iter()
            .filter(|k| !k.is_empty() && description.contains(&k.to_lowercase()))
            .cloned()
            .collect();
        let keyword_score = (matched_keywords.len() as i32 * 10).min(30);

        JobMatchBreakdown {
            skills_score,
            experience_score,
            keyword_score,
            matched_skills,
            matched_keywords,
        }
    }

    /// Label table for the application score. Cutoffs 75/50/25; the job
    /// match table below uses 70/50/30. The two are intentionally kept
    /// separate, UI copy depends on each table verbatim.
    pub fn application_score_label(score: i32) -> &'static str {
        match score {
            s if s >= 75 => "Excellent",
            s if s >= 50 => "Good",
            s if s >= 25 => "Fair",
            _ => "Weak",
        }
    }

    pub fn job_match_label(score: i32) -> &'static str {
        match score {
            s if s >= 70 => "Excellent Match",
            s if s >= 50 => "Good Match",
            s if s >= 30 => "Fair Match",
            _ => "Low Match",
        }
    }
}

/// Computes scores on demand and persists them through the store.
/// Scoring is advisory: nothing here ever touches pipeline status, and it
/// is safe to run concurrently with transitions (last write wins on the
/// keyed upsert).
#[derive(Clone)]
pub struct ScoringService {
    store: Arc<dyn Store>,
}

impl ScoringService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn score_application(&self, application_id: Uuid) -> Result<MatchScore> {
        let application = self
            .store
            .get_application(application_id)
            .await?
            .ok_or_else(|| Error::not_found("Application", application_id))?;
        let profile = self
            .store
            .get_candidate_profile(application.candidate_id)
            .await?
            .ok_or_else(|| Error::not_found("CandidateProfile", application.candidate_id))?;
        let job = self
            .store
            .get_job(application.job_id)
            .await?
            .ok_or_else(|| Error::not_found("Job", application.job_id))?;
        // a missing agency record degrades the agency sub-score to zero
        let agency = match application.agency_id {
            Some(org_id) => self.store.get_agency_profile(org_id).await?,
            None => None,
        };
        let last_interview = self.store.latest_interview(application.id).await?;

        let breakdown = ScoreCalculator::application_breakdown(
            &profile,
            &job,
            agency.as_ref(),
            last_interview.as_ref(),
        );
        let explanation = format!(
            "Skills {}/40, experience {}/30, agency {}/20, interview {}/10",
            breakdown.skills_match,
            breakdown.experience_match,
            breakdown.agency_score,
            breakdown.interview_score
        );

        let score = MatchScore {
            id: Uuid::new_v4(),
            application_id: Some(application.id),
            job_id: Some(application.job_id),
            candidate_id: Some(application.candidate_id),
            score: breakdown.total(),
            breakdown: serde_json::to_value(&breakdown)?,
            explanation: Some(explanation),
            created_at: Utc::now(),
            updated_at: None,
        };
        let stored = self.store.upsert_application_score(score).await?;
        tracing::info!(application_id = %application.id, score = stored.score, "application score stored");
        Ok(stored)
    }

    pub async fn score_job_match(&self, job_id: Uuid, candidate_id: Uuid) -> Result<MatchScore> {
        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or_else(|| Error::not_found("Job", job_id))?;
        let profile = self
            .store
            .get_candidate_profile(candidate_id)
            .await?
            .ok_or_else(|| Error::not_found("CandidateProfile", candidate_id))?;

        let breakdown = ScoreCalculator::job_match_breakdown(&profile, &job);
        let explanation = format!(
            "Matched {} skills and {} keywords in the job description; {} years of experience",
            breakdown.matched_skills.len(),
            breakdown.matched_keywords.len(),
            profile.years_experience
        );

        let score = MatchScore {
            id: Uuid::new_v4(),
            application_id: None,
            job_id: Some(job_id),
            candidate_id: Some(candidate_id),
            score: breakdown.total(),
            breakdown: serde_json::to_value(&breakdown)?,
            explanation: Some(explanation),
            created_at: Utc::now(),
            updated_at: None,
        };
        let stored = self.store.upsert_job_match_score(score).await?;
        tracing::info!(job_id = %job_id, candidate_id = %candidate_id, score = stored.score, "job match score stored");
        Ok(stored)
    }

    pub async fn get_application_score(&self, application_id: Uuid) -> Result<MatchScore> {
        self.store
            .get_application_score(application_id)
            .await?
            .ok_or_else(|| Error::not_found("Score", application_id))
    }

    pub async fn get_job_match_score(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<MatchScore> {
        self.store
            .get_job_match_score(job_id, candidate_id)
            .await?
            .ok_or_else(|| Error::not_found("Score", format!("{job_id}/{candidate_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockStore;

    fn profile(skills: &[&str], years: i32, keywords: &[&str]) -> CandidateProfile {
        CandidateProfile {
            candidate_id: Uuid::new_v4(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            years_experience: years,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            resume_url: None,
        }
    }

    fn job(keywords: &[&str], required: i32, description: Option<&str>) -> Job {
        Job {
            id: Uuid::new_v4(),
            org_id: Uuid::new_v4(),
            title: "Backend Engineer".into(),
            description: description.map(|d| d.to_string()),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            required_experience: required,
        }
    }

    #[test]
    fn application_breakdown_partial_skill_overlap() {
        // 2 of 4 keywords matched, exact experience, no agency, no interview
        let profile = profile(&["python", "sql"], 3, &[]);
        let job = job(&["python", "django", "sql", "aws"], 3, None);
        let breakdown = ScoreCalculator::application_breakdown(&profile, &job, None, None);
        assert_eq!(breakdown.skills_match, 20);
        assert_eq!(breakdown.experience_match, 30);
        assert_eq!(breakdown.agency_score, 0);
        assert_eq!(breakdown.interview_score, 0);
        assert_eq!(breakdown.total(), 50);
    }

    #[test]
    fn skills_match_is_case_insensitive_and_bidirectional() {
        let profile = profile(&["PostgreSQL"], 0, &[]);
        let job = job(&["postgres"], 0, None);
        let breakdown = ScoreCalculator::application_breakdown(&profile, &job, None, None);
        // "postgresql" contains "postgres"
        assert_eq!(breakdown.skills_match, 40);
    }

    #[test]
    fn experience_match_decays_by_five_per_year() {
        let job = job(&[], 5, None);
        for (years, expected) in [(5, 30), (4, 25), (7, 20), (11, 0), (0, 5)] {
            let profile = profile(&[], years, &[]);
            let breakdown = ScoreCalculator::application_breakdown(&profile, &job, None, None);
            assert_eq!(breakdown.experience_match, expected, "{years} years");
        }
    }

    #[test]
    fn agency_score_scales_and_caps() {
        let profile = profile(&[], 0, &[]);
        let job = job(&[], 0, None);
        let agency = |rate: f64| AgencyProfile {
            org_id: Uuid::new_v4(),
            name: "Acme Talent".into(),
            conversion_rate: rate,
        };
        let b = ScoreCalculator::application_breakdown(&profile, &job, Some(&agency(75.0)), None);
        assert_eq!(b.agency_score, 15);
        // caps at 20 even for rates above 100%
        let b = ScoreCalculator::application_breakdown(&profile, &job, Some(&agency(140.0)), None);
        assert_eq!(b.agency_score, 20);
    }

    #[test]
    fn interview_score_requires_completed_pass() {
        let profile = profile(&[], 0, &[]);
        let job = job(&[], 0, None);
        let mut interview = Interview {
            id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            round: crate::models::interview::InterviewRound::Technical,
            scheduled_at: Utc::now(),
            interviewer_id: None,
            status: InterviewStatus::Completed,
            feedback: Some("strong".into()),
            passed: Some(true),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: None,
        };
        let b =
            ScoreCalculator::application_breakdown(&profile, &job, None, Some(&interview));
        assert_eq!(b.interview_score, 10);

        interview.passed = Some(false);
        let b =
            ScoreCalculator::application_breakdown(&profile, &job, None, Some(&interview));
        assert_eq!(b.interview_score, 0);

        interview.passed = Some(true);
        interview.status = InterviewStatus::Scheduled;
        let b =
            ScoreCalculator::application_breakdown(&profile, &job, None, Some(&interview));
        assert_eq!(b.interview_score, 0);
    }

    #[test]
    fn job_match_counts_description_hits() {
        // three skills, two in the description; keyword absent
        let profile = profile(&["react", "typescript", "node"], 6, &["startup"]);
        let job = job(
            &[],
            0,
            Some("We build React dashboards in TypeScript for enterprise clients."),
        );
        let breakdown = ScoreCalculator::job_match_breakdown(&profile, &job);
        assert_eq!(breakdown.skills_score, 20);
        assert_eq!(breakdown.experience_score, 30);
        assert_eq!(breakdown.keyword_score, 0);
        assert_eq!(breakdown.total(), 50);
        assert_eq!(ScoreCalculator::job_match_label(breakdown.total()), "Good Match");
        assert_eq!(
            breakdown.matched_skills,
            vec!["react".to_string(), "typescript".to_string()]
        );
        assert!(breakdown.matched_keywords.is_empty());
    }

    #[test]
    fn job_match_sub_scores_are_capped() {
        let profile = profile(
            &["a1", "a2", "a3", "a4", "a5", "a6"],
            10,
            &["b1", "b2", "b3", "b4"],
        );
        let job = job(&[], 0, Some("a1 a2 a3 a4 a5 a6 b1 b2 b3 b4"));
        let breakdown = ScoreCalculator::job_match_breakdown(&profile, &job);
        assert_eq!(breakdown.skills_score, 40);
        assert_eq!(breakdown.keyword_score, 30);
        assert_eq!(breakdown.total(), 100);
    }

    #[test]
    fn missing_description_degrades_to_zero_sub_scores() {
        let profile = profile(&["react"], 0, &["startup"]);
        let job = job(&[], 0, None);
        let breakdown = ScoreCalculator::job_match_breakdown(&profile, &job);
        assert_eq!(breakdown.skills_score, 0);
        assert_eq!(breakdown.keyword_score, 0);
        assert_eq!(breakdown.experience_score, 5);
    }

    #[test]
    fn label_tables_diverge_at_the_documented_cutoffs() {
        assert_eq!(ScoreCalculator::application_score_label(75), "Excellent");
        assert_eq!(ScoreCalculator::application_score_label(74), "Good");
        assert_eq!(ScoreCalculator::application_score_label(25), "Fair");
        assert_eq!(ScoreCalculator::application_score_label(24), "Weak");

        assert_eq!(ScoreCalculator::job_match_label(70), "Excellent Match");
        assert_eq!(ScoreCalculator::job_match_label(69), "Good Match");
        assert_eq!(ScoreCalculator::job_match_label(30), "Fair Match");
        assert_eq!(ScoreCalculator::job_match_label(29), "Low Match");
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_store_unavailable() {
        let mut store = MockStore::new();
        store
            .expect_get_application()
            .returning(|_| Err(crate::error::Error::StoreUnavailable("connection reset".into())));
        let service = ScoringService::new(Arc::new(store));
        let err = service.score_application(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, crate::error::Error::StoreUnavailable(_)));
    }
}
