use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::dto::application_dto::{ApplicationDetails, CandidateSummary, JobOfferSummary};
use crate::dto::interview_dto::InterviewerSummary;
use crate::dto::pagination::Paginated;
use crate::dto::patch::{nullable, Nullable};
use crate::models::application::{ApplicationStatus, CandidateApplication};
use crate::models::interview::{Interview, InterviewStatus, InterviewType};
use crate::models::review::{InterviewReview, ReviewStatus};

pub const MAX_HIGHLIGHTS: usize = 20;
pub const MAX_HIGHLIGHT_LEN: usize = 200;
pub const MAX_NOTES_LEN: usize = 10000;
const MIN_SCORE: i32 = 1;
const MAX_SCORE: i32 = 10;

fn validate_highlights(items: &[String]) -> Result<(), ValidationError> {
    if items.len() > MAX_HIGHLIGHTS {
        return Err(ValidationError::new("too_many_items"));
    }
    if items
        .iter()
        .any(|item| item.trim().is_empty() || item.chars().count() > MAX_HIGHLIGHT_LEN)
    {
        return Err(ValidationError::new("invalid_item_length"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewPayload {
    /// Defaults to the authenticated employee.
    pub employee_id: Option<Uuid>,
    pub interview_id: Uuid,
    pub candidate_application_id: Uuid,
    #[serde(default)]
    pub status: ReviewStatus,
    #[validate(length(max = 10000))]
    pub notes: Option<String>,
    #[validate(range(min = 1, max = 10, message = "score must be between 1 and 10"))]
    pub score: Option<i32>,
    #[validate(custom(function = "validate_highlights"))]
    pub strengths: Option<Vec<String>>,
    #[validate(custom(function = "validate_highlights"))]
    pub weaknesses: Option<Vec<String>>,
}

/// Partial update. `notes`, `score`, `strengths` and `weaknesses` are cleared by an
/// explicit `null`; omitted fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_review_update"))]
pub struct UpdateReviewPayload {
    pub status: Option<ReviewStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Nullable<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub score: Nullable<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub strengths: Nullable<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub weaknesses: Nullable<Vec<String>>,
}

fn validate_review_update(payload: &UpdateReviewPayload) -> Result<(), ValidationError> {
    if let Some(Some(notes)) = &payload.notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(invalid("notes_length", "notes must be at most 10000 characters"));
        }
    }
    if let Some(Some(score)) = payload.score {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(invalid("score_range", "score must be between 1 and 10"));
        }
    }
    for items in [&payload.strengths, &payload.weaknesses].into_iter().flatten().flatten() {
        validate_highlights(items)?;
    }
    Ok(())
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// A review with its author, interview, and the reviewed application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDetails {
    #[serde(flatten)]
    pub review: InterviewReview,
    pub employee: InterviewerSummary,
    pub interview: Interview,
    pub candidate_application: ApplicationDetails,
}

pub type ReviewPage = Paginated<ReviewDetails>;

/// Flat row produced by the review join across interviews, employees, applications,
/// candidates and job offers.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub employee_id: Uuid,
    pub candidate_application_id: Uuid,
    pub status: ReviewStatus,
    pub notes: Option<String>,
    pub score: Option<i32>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub employee_full_name: String,
    pub employee_email: String,
    pub interview_type: InterviewType,
    pub interview_scheduled_time: DateTime<Utc>,
    pub interview_meeting_link: Option<String>,
    pub interview_status: InterviewStatus,
    pub interview_created_at: DateTime<Utc>,
    pub interview_updated_at: DateTime<Utc>,
    pub application_job_offer_id: Uuid,
    pub application_candidate_id: Uuid,
    pub application_status: ApplicationStatus,
    pub application_created_at: DateTime<Utc>,
    pub application_updated_at: DateTime<Utc>,
    pub candidate_full_name: String,
    pub candidate_email: String,
    pub job_offer_title: String,
    pub job_offer_status: String,
}

impl From<ReviewRow> for ReviewDetails {
    fn from(row: ReviewRow) -> Self {
        Self {
            employee: InterviewerSummary {
                id: row.employee_id,
                full_name: row.employee_full_name,
                email: row.employee_email,
            },
            interview: Interview {
                id: row.interview_id,
                interview_type: row.interview_type,
                scheduled_time: row.interview_scheduled_time,
                meeting_link: row.interview_meeting_link,
                status: row.interview_status,
                created_at: row.interview_created_at,
                updated_at: row.interview_updated_at,
            },
            candidate_application: ApplicationDetails {
                application: CandidateApplication {
                    id: row.candidate_application_id,
                    job_offer_id: row.application_job_offer_id,
                    candidate_id: row.application_candidate_id,
                    status: row.application_status,
                    created_at: row.application_created_at,
                    updated_at: row.application_updated_at,
                },
                candidate: CandidateSummary {
                    id: row.application_candidate_id,
                    full_name: row.candidate_full_name,
                    email: row.candidate_email,
                },
                job_offer: JobOfferSummary {
                    id: row.application_job_offer_id,
                    title: row.job_offer_title,
                    status: row.job_offer_status,
                },
                skill_answers: None,
            },
            review: InterviewReview {
                id: row.id,
                interview_id: row.interview_id,
                employee_id: row.employee_id,
                candidate_application_id: row.candidate_application_id,
                status: row.status,
                notes: row.notes,
                score: row.score,
                strengths: row.strengths,
                weaknesses: row.weaknesses,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateReviewPayload {
        CreateReviewPayload {
            employee_id: None,
            interview_id: Uuid::new_v4(),
            candidate_application_id: Uuid::new_v4(),
            status: ReviewStatus::Pending,
            notes: None,
            score: Some(7),
            strengths: Some(vec!["Clear communicator".into()]),
            weaknesses: None,
        }
    }

    #[test]
    fn score_must_stay_within_one_to_ten() {
        assert!(payload().validate().is_ok());

        let mut too_high = payload();
        too_high.score = Some(11);
        assert!(too_high.validate().is_err());

        let mut too_low = payload();
        too_low.score = Some(0);
        assert!(too_low.validate().is_err());
    }

    #[test]
    fn highlights_reject_blank_and_oversized_items() {
        let mut blank = payload();
        blank.weaknesses = Some(vec!["   ".into()]);
        assert!(blank.validate().is_err());

        let mut long = payload();
        long.strengths = Some(vec!["x".repeat(MAX_HIGHLIGHT_LEN + 1)]);
        assert!(long.validate().is_err());
    }

    #[test]
    fn status_defaults_to_pending_when_omitted() {
        let json = serde_json::json!({
            "interview_id": Uuid::new_v4(),
            "candidate_application_id": Uuid::new_v4(),
        });
        let parsed: CreateReviewPayload = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.status, ReviewStatus::Pending);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn update_distinguishes_cleared_fields_from_omitted_ones() {
        let parsed: UpdateReviewPayload = serde_json::from_value(serde_json::json!({
            "notes": null,
            "score": 4
        }))
        .unwrap();
        assert_eq!(parsed.notes, Some(None));
        assert_eq!(parsed.score, Some(Some(4)));
        assert_eq!(parsed.strengths, None);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn update_validates_only_supplied_values() {
        let cleared = UpdateReviewPayload {
            score: Some(None),
            strengths: Some(None),
            ..Default::default()
        };
        assert!(cleared.validate().is_ok());

        let out_of_range = UpdateReviewPayload {
            score: Some(Some(11)),
            ..Default::default()
        };
        assert!(out_of_range.validate().is_err());

        let blank = UpdateReviewPayload {
            weaknesses: Some(Some(vec!["  ".into()])),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }
}
