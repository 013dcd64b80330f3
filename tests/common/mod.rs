use std::sync::Arc;

use talentflow_backend::models::actor::{Actor, Role};
use talentflow_backend::models::profile::{AgencyProfile, CandidateProfile, Job};
use talentflow_backend::store::{MemoryStore, Store};
use uuid::Uuid;

pub struct Fixture {
    pub store: Arc<dyn Store>,
    pub employer: Actor,
    pub agency: Actor,
    pub candidate: Actor,
    pub job_id: Uuid,
    pub org_id: Uuid,
    pub agency_org_id: Uuid,
}

/// One employer org with a posted job, one agency with a track record,
/// one candidate with a profile.
pub async fn fixture() -> Fixture {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

    let org_id = Uuid::new_v4();
    let agency_org_id = Uuid::new_v4();
    let job_id = Uuid::new_v4();
    let candidate_id = Uuid::new_v4();

    store
        .upsert_job(Job {
            id: job_id,
            org_id,
            title: "Backend Engineer".into(),
            description: Some("We build python and sql services on aws.".into()),
            keywords: vec!["python".into(), "django".into(), "sql".into(), "aws".into()],
            required_experience: 3,
        })
        .await
        .expect("seed job");

    store
        .upsert_candidate_profile(CandidateProfile {
            candidate_id,
            skills: vec!["python".into(), "sql".into()],
            years_experience: 3,
            keywords: vec!["fintech".into()],
            resume_url: None,
        })
        .await
        .expect("seed profile");

    store
        .upsert_agency_profile(AgencyProfile {
            org_id: agency_org_id,
            name: "Acme Talent".into(),
            conversion_rate: 75.0,
        })
        .await
        .expect("seed agency");

    Fixture {
        store,
        employer: Actor::new(Uuid::new_v4(), Role::Employer, Some(org_id)),
        agency: Actor::new(Uuid::new_v4(), Role::Agency, Some(agency_org_id)),
        candidate: Actor::new(candidate_id, Role::Candidate, None),
        job_id,
        org_id,
        agency_org_id,
    }
}
