use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidateUrl, ValidationError};

use crate::dto::application_dto::ApplicationDetails;
use crate::dto::pagination::{PageQuery, PageRequest, Paginated};
use crate::dto::patch::{nullable, Nullable};
use crate::models::interview::{Interview, InterviewStatus, InterviewType};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInterviewPayload {
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub scheduled_time: DateTime<Utc>,
    #[validate(url)]
    pub meeting_link: Option<String>,
    pub status: Option<InterviewStatus>,
    #[validate(length(min = 1, message = "at least one application is required"))]
    pub application_ids: Vec<Uuid>,
    #[validate(length(min = 1, message = "at least one interviewer is required"))]
    pub interviewer_ids: Vec<Uuid>,
}

/// Partial update. Id lists, when present, replace the current participants; an
/// explicit `null` meeting link removes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_meeting_link"))]
pub struct UpdateInterviewPayload {
    #[serde(rename = "type")]
    pub interview_type: Option<InterviewType>,
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub meeting_link: Nullable<String>,
    pub status: Option<InterviewStatus>,
    #[validate(length(min = 1, message = "at least one application is required"))]
    pub application_ids: Option<Vec<Uuid>>,
    #[validate(length(min = 1, message = "at least one interviewer is required"))]
    pub interviewer_ids: Option<Vec<Uuid>>,
}

fn validate_meeting_link(payload: &UpdateInterviewPayload) -> Result<(), ValidationError> {
    match &payload.meeting_link {
        Some(Some(link)) if !link.validate_url() => {
            let mut err = ValidationError::new("url");
            err.message = Some("meeting_link must be a valid URL".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(default)]
pub struct InterviewListQuery {
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub status: Option<InterviewStatus>,
    pub application_id: Option<Uuid>,
    pub candidate_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl InterviewListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
        .into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewerSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

/// An interview with its linked applications (candidate and job offer joined) and interviewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewDetails {
    #[serde(flatten)]
    pub interview: Interview,
    pub applications: Vec<ApplicationDetails>,
    pub interviewers: Vec<InterviewerSummary>,
}

pub type InterviewPage = Paginated<InterviewDetails>;
