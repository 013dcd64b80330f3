mod common;

use talentflow_backend::error::Error;
use talentflow_backend::services::pipeline_service::PipelineService;
use talentflow_backend::services::visibility::{visible_view, ApplicationView};

/// Two-level shortlisting end to end: the employer only starts seeing an
/// agency submission once the agency promotes it out of its pool.
#[tokio::test]
async fn employer_visibility_flips_on_shortlist() {
    let fx = common::fixture().await;
    let pipeline = PipelineService::new(fx.store.clone());

    let app = pipeline
        .apply(&fx.agency, fx.job_id, Some(fx.candidate.id))
        .await
        .expect("agency submission");

    let stored = fx.store.get_application(app.id).await.unwrap().unwrap();
    let err = visible_view(&fx.employer, &stored, fx.org_id).unwrap_err();
    assert!(matches!(err, Error::Forbidden { .. }));

    // the agency still sees its own pool
    assert!(visible_view(&fx.agency, &stored, fx.org_id).is_ok());

    pipeline
        .shortlist(&fx.agency, app.id)
        .await
        .expect("shortlist");

    let stored = fx.store.get_application(app.id).await.unwrap().unwrap();
    match visible_view(&fx.employer, &stored, fx.org_id).expect("visible after shortlist") {
        ApplicationView::Full(full) => assert_eq!(full.id, app.id),
        ApplicationView::Technical(_) => panic!("employer gets the full record"),
    }
}

/// The gate keeps applying at terminal stages: agencies retain access to
/// rejected submissions, the candidate always sees their own row.
#[tokio::test]
async fn terminal_rows_stay_visible_to_their_actors() {
    let fx = common::fixture().await;
    let pipeline = PipelineService::new(fx.store.clone());

    let app = pipeline
        .apply(&fx.agency, fx.job_id, Some(fx.candidate.id))
        .await
        .expect("agency submission");
    pipeline.reject(&fx.agency, app.id).await.expect("reject");

    let stored = fx.store.get_application(app.id).await.unwrap().unwrap();
    assert!(visible_view(&fx.agency, &stored, fx.org_id).is_ok());
    assert!(visible_view(&fx.candidate, &stored, fx.org_id).is_ok());
    // rejected rows are employer-visible for audit/reporting
    assert!(visible_view(&fx.employer, &stored, fx.org_id).is_ok());
}
