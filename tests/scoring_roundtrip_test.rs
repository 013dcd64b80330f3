mod common;

use chrono::{Duration, Utc};
use talentflow_backend::models::interview::{InterviewRound, InterviewStatus};
use talentflow_backend::models::score::{ApplicationBreakdown, JobMatchBreakdown};
use talentflow_backend::services::pipeline_service::PipelineService;
use talentflow_backend::services::scoring_service::ScoringService;

#[tokio::test]
async fn application_score_round_trips_through_the_store() {
    let fx = common::fixture().await;
    let pipeline = PipelineService::new(fx.store.clone());
    let scoring = ScoringService::new(fx.store.clone());

    let app = pipeline
        .apply(&fx.candidate, fx.job_id, None)
        .await
        .expect("apply");

    let computed = scoring.score_application(app.id).await.expect("compute");
    // 2 of 4 keywords, exact experience, no agency, no interview
    assert_eq!(computed.score, 50);
    let breakdown: ApplicationBreakdown =
        serde_json::from_value(computed.breakdown.clone()).expect("breakdown shape");
    assert_eq!(breakdown.skills_match, 20);
    assert_eq!(breakdown.experience_match, 30);
    assert_eq!(breakdown.agency_score, 0);
    assert_eq!(breakdown.interview_score, 0);
    assert_eq!(breakdown.total(), computed.score);

    let read_back = scoring
        .get_application_score(app.id)
        .await
        .expect("read back");
    assert_eq!(read_back.id, computed.id);
    assert_eq!(read_back.score, computed.score);
    assert_eq!(read_back.breakdown, computed.breakdown);
}

#[tokio::test]
async fn recomputation_overwrites_in_place() {
    let fx = common::fixture().await;
    let pipeline = PipelineService::new(fx.store.clone());
    let scoring = ScoringService::new(fx.store.clone());

    // agency-led submission: the agency sub-score now participates
    let app = pipeline
        .apply(&fx.agency, fx.job_id, Some(fx.candidate.id))
        .await
        .expect("submission");
    let first = scoring.score_application(app.id).await.expect("first");
    // conversion rate 75% -> round(75 * 0.2) = 15
    assert_eq!(first.score, 65);

    // a passed interview adds its sub-score on recomputation
    pipeline.shortlist(&fx.agency, app.id).await.expect("shortlist");
    pipeline
        .advance_to_review(&fx.employer, app.id)
        .await
        .expect("advance");
    let interview = pipeline
        .schedule_interview(
            &fx.employer,
            app.id,
            InterviewRound::Technical,
            Utc::now() + Duration::days(1),
            None,
        )
        .await
        .expect("schedule");
    pipeline
        .submit_interview_feedback(
            &fx.employer,
            interview.id,
            InterviewStatus::Completed,
            Some("Passed the bar".into()),
            Some(true),
        )
        .await
        .expect("complete");

    let second = scoring.score_application(app.id).await.expect("second");
    assert_eq!(second.score, 75);
    // same keyed row, overwritten wholesale
    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at.is_some());

    let read_back = scoring.get_application_score(app.id).await.expect("read");
    assert_eq!(read_back.score, 75);
}

#[tokio::test]
async fn job_match_score_round_trips() {
    let fx = common::fixture().await;
    let scoring = ScoringService::new(fx.store.clone());

    let computed = scoring
        .score_job_match(fx.job_id, fx.candidate.id)
        .await
        .expect("compute");
    // description "We build python and sql services on aws." matches both
    // skills; "fintech" is absent; 3 years of experience -> tier 25
    let breakdown: JobMatchBreakdown =
        serde_json::from_value(computed.breakdown.clone()).expect("breakdown shape");
    assert_eq!(breakdown.skills_score, 20);
    assert_eq!(breakdown.experience_score, 25);
    assert_eq!(breakdown.keyword_score, 0);
    assert_eq!(
        breakdown.matched_skills,
        vec!["python".to_string(), "sql".to_string()]
    );
    assert_eq!(computed.score, 45);
    assert_eq!(breakdown.total(), computed.score);

    let read_back = scoring
        .get_job_match_score(fx.job_id, fx.candidate.id)
        .await
        .expect("read back");
    assert_eq!(read_back.score, computed.score);
    assert_eq!(read_back.breakdown, computed.breakdown);
    assert_eq!(read_back.explanation, computed.explanation);
}
