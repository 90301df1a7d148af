use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::interview_dto::InterviewPage;
use crate::dto::pagination::{PageRequest, Paginated};
use crate::dto::review_dto::{
    CreateReviewPayload, ReviewDetails, ReviewPage, ReviewRow, UpdateReviewPayload,
};
use crate::error::{Error, Result};
use crate::models::interview::Interview;
use crate::models::review::{InterviewReview, ReviewStatus};
use crate::services::application_service::ApplicationService;
use crate::services::directory_service::DirectoryService;
use crate::services::interview_service::InterviewService;
use crate::utils::validation::{ensure_review_participation, validate};

const REVIEW_DETAILS_SELECT: &str = r#"
    SELECT
        r.id, r.interview_id, r.employee_id, r.candidate_application_id, r.status,
        r.notes, r.score, r.strengths, r.weaknesses, r.created_at, r.updated_at,
        e.full_name AS employee_full_name, e.email AS employee_email,
        i.interview_type,
        i.scheduled_time AS interview_scheduled_time,
        i.meeting_link AS interview_meeting_link,
        i.status AS interview_status,
        i.created_at AS interview_created_at,
        i.updated_at AS interview_updated_at,
        ca.job_offer_id AS application_job_offer_id,
        ca.candidate_id AS application_candidate_id,
        ca.status AS application_status,
        ca.created_at AS application_created_at,
        ca.updated_at AS application_updated_at,
        c.full_name AS candidate_full_name, c.email AS candidate_email,
        jo.title AS job_offer_title, jo.status AS job_offer_status
    FROM interview_reviews r
    JOIN employees e ON e.id = r.employee_id
    JOIN interviews i ON i.id = r.interview_id
    JOIN candidate_applications ca ON ca.id = r.candidate_application_id
    JOIN candidates c ON c.id = ca.candidate_id
    JOIN job_offers jo ON jo.id = ca.job_offer_id"#;

const REVIEW_COLUMNS: &str = "id, interview_id, employee_id, candidate_application_id, status, notes, score, strengths, weaknesses, created_at, updated_at";

const PENDING_REVIEW_FILTER: &str = r#"
    WHERE EXISTS (
            SELECT 1 FROM interview_interviewers ii
            WHERE ii.interview_id = i.id AND ii.employee_id = $1)
      AND i.scheduled_time <= NOW()
      AND NOT EXISTS (
            SELECT 1 FROM interview_reviews r
            WHERE r.interview_id = i.id AND r.employee_id = $1)"#;

/// Owns interview reviews and the participation rules around filing them.
#[derive(Clone)]
pub struct ReviewService {
    pool: PgPool,
    directory: DirectoryService,
    applications: ApplicationService,
    interviews: InterviewService,
}

impl ReviewService {
    pub fn new(
        pool: PgPool,
        directory: DirectoryService,
        applications: ApplicationService,
        interviews: InterviewService,
    ) -> Self {
        Self {
            pool,
            directory,
            applications,
            interviews,
        }
    }

    pub async fn create(&self, employee_id: Uuid, payload: CreateReviewPayload) -> Result<ReviewDetails> {
        validate(&payload)?;
        let interview_id = payload.interview_id;
        let application_id = payload.candidate_application_id;
        let mut tx = self.pool.begin().await?;

        if !self.directory.employee_exists(&mut tx, employee_id).await? {
            return Err(Error::NotFound(format!("Employee {} not found", employee_id)));
        }
        if self
            .interviews
            .get_locked_for_share(&mut tx, interview_id)
            .await?
            .is_none()
        {
            return Err(Error::NotFound(format!("Interview {} not found", interview_id)));
        }
        if !self.applications.exists(&mut tx, application_id).await? {
            return Err(Error::NotFound(format!("Application {} not found", application_id)));
        }

        let participants = self.interviews.participants(&mut tx, interview_id).await?;
        if let Err(err) =
            ensure_review_participation(&participants, interview_id, employee_id, application_id)
        {
            tracing::warn!(%interview_id, %employee_id, %application_id, error = %err, "Review rejected");
            return Err(err);
        }

        let duplicate: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(
                SELECT 1 FROM interview_reviews
                WHERE interview_id = $1 AND employee_id = $2 AND candidate_application_id = $3
            )"#,
        )
        .bind(interview_id)
        .bind(employee_id)
        .bind(application_id)
        .fetch_one(&mut *tx)
        .await?;
        if duplicate {
            tracing::warn!(%interview_id, %employee_id, %application_id, "Duplicate review rejected");
            return Err(Error::Conflict(format!(
                "Review already exists for employee {} on application {} in interview {}",
                employee_id, application_id, interview_id
            )));
        }

        let review = sqlx::query_as::<_, InterviewReview>(&format!(
            r#"
            INSERT INTO interview_reviews (
                interview_id, employee_id, candidate_application_id,
                status, notes, score, strengths, weaknesses
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(interview_id)
        .bind(employee_id)
        .bind(application_id)
        .bind(payload.status)
        .bind(&payload.notes)
        .bind(payload.score)
        .bind(payload.strengths.clone().unwrap_or_default())
        .bind(payload.weaknesses.clone().unwrap_or_default())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(
            review_id = %review.id,
            %interview_id,
            %employee_id,
            %application_id,
            status = ?review.status,
            "Review filed"
        );

        self.find_one(review.id).await
    }

    pub async fn find_one(&self, id: Uuid) -> Result<ReviewDetails> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!("{} WHERE r.id = $1", REVIEW_DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(row.into())
    }

    pub async fn find_by_interview(&self, interview_id: Uuid) -> Result<Vec<ReviewDetails>> {
        if !self.interviews.exists(interview_id).await? {
            return Err(Error::NotFound(format!("Interview {} not found", interview_id)));
        }

        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "{} WHERE r.interview_id = $1 ORDER BY r.created_at, r.id",
            REVIEW_DETAILS_SELECT
        ))
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ReviewDetails::from).collect())
    }

    /// Reviews one interviewer filed for one interview. Rejects callers who were not on
    /// the panel with `BadRequest`.
    pub async fn find_by_employee_and_interview(
        &self,
        employee_id: Uuid,
        interview_id: Uuid,
    ) -> Result<Vec<ReviewDetails>> {
        let (_, interview_exists) = tokio::try_join!(
            self.directory.get_employee(employee_id),
            self.interviews.exists(interview_id),
        )?;
        if !interview_exists {
            return Err(Error::NotFound(format!("Interview {} not found", interview_id)));
        }

        let mut conn = self.pool.acquire().await?;
        let participants = self.interviews.participants(&mut conn, interview_id).await?;
        drop(conn);
        if !participants.has_interviewer(employee_id) {
            return Err(Error::BadRequest(format!(
                "Employee {} is not an interviewer for interview {}",
                employee_id, interview_id
            )));
        }

        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "{} WHERE r.employee_id = $1 AND r.interview_id = $2 ORDER BY r.created_at, r.id",
            REVIEW_DETAILS_SELECT
        ))
        .bind(employee_id)
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ReviewDetails::from).collect())
    }

    pub async fn find_by_candidate_application(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<ReviewDetails>> {
        let mut conn = self.pool.acquire().await?;
        let exists = self.applications.exists(&mut conn, application_id).await?;
        drop(conn);
        if !exists {
            return Err(Error::NotFound(format!("Application {} not found", application_id)));
        }

        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "{} WHERE r.candidate_application_id = $1 ORDER BY r.created_at, r.id",
            REVIEW_DETAILS_SELECT
        ))
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ReviewDetails::from).collect())
    }

    /// Past interviews, whatever their status, on which `employee_id` sat and has not filed any
    /// review yet, most recent first.
    pub async fn find_interviews_pending_review(
        &self,
        employee_id: Uuid,
        page: PageRequest,
    ) -> Result<InterviewPage> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM interviews i {}",
            PENDING_REVIEW_FILTER
        ))
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;

        let interviews = sqlx::query_as::<_, Interview>(&format!(
            "SELECT i.id, i.interview_type, i.scheduled_time, i.meeting_link, i.status, i.created_at, i.updated_at \
             FROM interviews i {} ORDER BY i.scheduled_time DESC, i.id LIMIT $2 OFFSET $3",
            PENDING_REVIEW_FILTER
        ))
        .bind(employee_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let data = self.interviews.hydrate(interviews).await?;
        Ok(Paginated::new(data, page, total))
    }

    pub async fn find_my_completed_reviews(
        &self,
        employee_id: Uuid,
        page: PageRequest,
    ) -> Result<ReviewPage> {
        let total: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM interview_reviews WHERE employee_id = $1"#)
                .bind(employee_id)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "{} WHERE r.employee_id = $1 ORDER BY r.created_at DESC, r.id LIMIT $2 OFFSET $3",
            REVIEW_DETAILS_SELECT
        ))
        .bind(employee_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated::new(
            rows.into_iter().map(ReviewDetails::from).collect(),
            page,
            total,
        ))
    }

    /// Partial update; only the author may edit a review.
    pub async fn update(
        &self,
        id: Uuid,
        editor_id: Uuid,
        payload: UpdateReviewPayload,
    ) -> Result<ReviewDetails> {
        validate(&payload)?;
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE interview_reviews
            SET
                status = COALESCE($3, status),
                notes = CASE WHEN $4 THEN $5 ELSE notes END,
                score = CASE WHEN $6 THEN $7 ELSE score END,
                strengths = CASE WHEN $8 THEN COALESCE($9, '{}'::text[]) ELSE strengths END,
                weaknesses = CASE WHEN $10 THEN COALESCE($11, '{}'::text[]) ELSE weaknesses END,
                updated_at = NOW()
            WHERE id = $1 AND employee_id = $2
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(editor_id)
        .bind(payload.status)
        .bind(payload.notes.is_some())
        .bind(payload.notes.clone().flatten())
        .bind(payload.score.is_some())
        .bind(payload.score.flatten())
        .bind(payload.strengths.is_some())
        .bind(payload.strengths.clone().flatten())
        .bind(payload.weaknesses.is_some())
        .bind(payload.weaknesses.clone().flatten())
        .fetch_optional(&self.pool)
        .await?;

        // Nothing matched: either the review is gone or someone else wrote it.
        if updated.is_none() {
            let exists: bool = sqlx::query_scalar(
                r#"SELECT EXISTS(SELECT 1 FROM interview_reviews WHERE id = $1)"#,
            )
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
            return Err(if exists {
                Error::Forbidden(format!("Review {} can only be edited by its author", id))
            } else {
                not_found(id)
            });
        }
        tracing::info!(review_id = %id, employee_id = %editor_id, "Review updated");
        self.find_one(id).await
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM interview_reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(not_found(id));
        }
        tracing::info!(review_id = %id, "Review deleted");
        Ok(())
    }

    pub async fn count_pending(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM interview_reviews WHERE status = $1"#)
                .bind(ReviewStatus::Pending)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Review {} not found", id))
}
