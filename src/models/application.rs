use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Hiring status of a candidate application.
///
/// The nominal flow is `APPLIED -> IN_PROGRESS -> {HIRED, REJECTED}`. Only the
/// interview scheduler moves a row automatically (`APPLIED -> IN_PROGRESS`);
/// every other transition is an explicit employer action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    InProgress,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    /// Status a freshly submitted application is stored with.
    pub const ON_SUBMISSION: ApplicationStatus = ApplicationStatus::InProgress;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CandidateApplication {
    pub id: Uuid,
    pub job_offer_id: Uuid,
    pub candidate_id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SkillAnswer {
    pub id: Uuid,
    pub application_id: Uuid,
    pub position: i32,
    pub skill: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}
