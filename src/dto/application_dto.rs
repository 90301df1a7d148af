use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::dto::pagination::{PageQuery, PageRequest, Paginated};
use crate::models::application::{ApplicationStatus, CandidateApplication, SkillAnswer};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SkillAnswerInput {
    #[validate(length(min = 1, max = 200))]
    pub skill: String,
    #[validate(length(min = 1, max = 5000))]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateApplicationPayload {
    pub job_offer_id: Uuid,
    /// Required when an employee files on behalf of a candidate; candidates apply as themselves.
    pub candidate_id: Option<Uuid>,
    #[serde(default)]
    #[validate(nested)]
    pub skill_answers: Vec<SkillAnswerInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateApplicationPayload {
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HireApplicationPayload {
    pub application_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(default)]
pub struct ApplicationListQuery {
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub status: Option<ApplicationStatus>,
    pub candidate_id: Option<Uuid>,
    pub job_offer_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ApplicationListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
        .into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOfferSummary {
    pub id: Uuid,
    pub title: String,
    pub status: String,
}

/// An application joined with the candidate and job offer it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDetails {
    #[serde(flatten)]
    pub application: CandidateApplication,
    pub candidate: CandidateSummary,
    pub job_offer: JobOfferSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_answers: Option<Vec<SkillAnswer>>,
}

pub type ApplicationPage = Paginated<ApplicationDetails>;

/// Flat row produced by the application/candidate/job-offer join.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_offer_id: Uuid,
    pub candidate_id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub candidate_full_name: String,
    pub candidate_email: String,
    pub job_offer_title: String,
    pub job_offer_status: String,
}

impl From<ApplicationRow> for ApplicationDetails {
    fn from(row: ApplicationRow) -> Self {
        Self {
            application: CandidateApplication {
                id: row.id,
                job_offer_id: row.job_offer_id,
                candidate_id: row.candidate_id,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            candidate: CandidateSummary {
                id: row.candidate_id,
                full_name: row.candidate_full_name,
                email: row.candidate_email,
            },
            job_offer: JobOfferSummary {
                id: row.job_offer_id,
                title: row.job_offer_title,
                status: row.job_offer_status,
            },
            skill_answers: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct JobTitleCount {
    pub job_title: String,
    pub count: i64,
}
