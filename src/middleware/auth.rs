use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::models::actor::{Actor, Role};

/// Token claims issued by the external identity service. `role` must be
/// one of the closed role set; `org` is required for employer and agency
/// tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Role,
    pub org: Option<String>,
}

fn unauthorized(reason: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": reason }))).into_response()
}

/// Decodes the bearer token and stores a typed [`Actor`] in request
/// extensions. Authorization proper happens downstream, in the pipeline
/// service and the visibility gate.
pub async fn require_actor(mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let claims = match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => data.claims,
        Err(_) => return unauthorized("invalid_token"),
    };

    let Ok(actor_id) = Uuid::parse_str(&claims.sub) else {
        return unauthorized("invalid_subject");
    };
    let org_id = match claims.org.as_deref() {
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => return unauthorized("invalid_org"),
        },
        None => None,
    };
    if matches!(claims.role, Role::Employer | Role::Agency) && org_id.is_none() {
        return unauthorized("missing_org");
    }

    req.extensions_mut()
        .insert(Actor::new(actor_id, claims.role, org_id));
    next.run(req).await
}
