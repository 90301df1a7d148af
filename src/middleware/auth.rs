use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Candidate,
    Employee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub user_type: UserType,
    #[serde(default)]
    pub employee_roles: Vec<String>,
}

/// Identity attached to every authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub entity_id: Uuid,
    pub user_type: UserType,
    pub employee_roles: Vec<String>,
}

impl Caller {
    pub fn is_employee(&self) -> bool {
        self.user_type == UserType::Employee
    }

    pub fn ensure_employee(&self) -> Result<()> {
        if self.is_employee() {
            Ok(())
        } else {
            Err(Error::Forbidden("Employee access required".to_string()))
        }
    }

    /// The entity an operation acts for: the caller itself unless `requested` names
    /// someone else, which is refused.
    pub fn acting_as(&self, requested: Option<Uuid>) -> Result<Uuid> {
        match requested {
            Some(id) if id != self.entity_id => Err(Error::Forbidden(format!(
                "Caller {} cannot act on behalf of {}",
                self.entity_id, id
            ))),
            _ => Ok(self.entity_id),
        }
    }
}

impl TryFrom<Claims> for Caller {
    type Error = &'static str;

    fn try_from(claims: Claims) -> std::result::Result<Self, Self::Error> {
        let entity_id = Uuid::parse_str(&claims.sub).map_err(|_| "invalid_subject")?;
        Ok(Self {
            entity_id,
            user_type: claims.user_type,
            employee_roles: claims.employee_roles,
        })
    }
}

/// Decodes the bearer token in `headers`. The error is the machine-readable reason
/// returned to the client.
pub fn decode_caller(headers: &HeaderMap, secret: &str) -> std::result::Result<Caller, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("missing_authorization")?;
    let auth_str = auth_header.to_str().map_err(|_| "bad_authorization")?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("unsupported_scheme")?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| "invalid_token")?;
    Caller::try_from(data.claims)
}

fn rejection(status: StatusCode, reason: &str) -> Response {
    (status, Json(json!({ "error": reason }))).into_response()
}

fn caller_from_request(req: &Request) -> std::result::Result<Caller, Response> {
    let config = crate::config::get_config();
    decode_caller(req.headers(), &config.jwt_secret).map_err(|reason| {
        tracing::warn!(reason, path = %req.uri().path(), "Rejected unauthenticated request");
        rejection(StatusCode::UNAUTHORIZED, reason)
    })
}

pub async fn authenticate(mut req: Request, next: Next) -> Response {
    match caller_from_request(&req) {
        Ok(caller) => {
            req.extensions_mut().insert(caller);
            next.run(req).await
        }
        Err(response) => response,
    }
}

pub async fn require_employee(mut req: Request, next: Next) -> Response {
    let caller = match caller_from_request(&req) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    if !caller.is_employee() {
        tracing::warn!(caller = %caller.entity_id, path = %req.uri().path(), "Rejected non-employee request");
        return rejection(StatusCode::FORBIDDEN, "forbidden");
    }
    req.extensions_mut().insert(caller);
    next.run(req).await
}
