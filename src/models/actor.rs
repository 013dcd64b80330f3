use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of recruiting roles. Every authorization decision in the
/// pipeline and the visibility gate is made over this enum, never over
/// raw role strings from a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "actor_role", rename_all = "snake_case")]
pub enum Role {
    Candidate,
    Agency,
    Employer,
    TechnicalReviewer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Agency => "agency",
            Role::Employer => "employer",
            Role::TechnicalReviewer => "technical_reviewer",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "candidate" => Ok(Role::Candidate),
            "agency" => Ok(Role::Agency),
            "employer" => Ok(Role::Employer),
            "technical_reviewer" => Ok(Role::TechnicalReviewer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// The acting identity behind a request. `org_id` is the employing or
/// agency organization for employer/agency actors; candidates and
/// technical reviewers act as individuals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub org_id: Option<Uuid>,
}

impl Actor {
    pub fn new(id: Uuid, role: Role, org_id: Option<Uuid>) -> Self {
        Self { id, role, org_id }
    }
}
