use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::application_dto::{
    ApplicationDetails, ApplicationListQuery, ApplicationPage, ApplicationRow,
    CreateApplicationPayload, JobTitleCount, UpdateApplicationPayload,
};
use crate::dto::pagination::Paginated;
use crate::error::{Error, Result};
use crate::models::application::{ApplicationStatus, CandidateApplication, SkillAnswer};
use crate::services::directory_service::DirectoryService;
use crate::utils::validation::{ensure_date_range, validate};

/// Column list matching [`ApplicationRow`]; pair with [`APPLICATION_DETAILS_FROM`].
pub(crate) const APPLICATION_DETAILS_COLUMNS: &str = r#"
    ca.id, ca.job_offer_id, ca.candidate_id, ca.status, ca.created_at, ca.updated_at,
    c.full_name AS candidate_full_name, c.email AS candidate_email,
    jo.title AS job_offer_title, jo.status AS job_offer_status"#;

pub(crate) const APPLICATION_DETAILS_FROM: &str = r#"
    FROM candidate_applications ca
    JOIN candidates c ON c.id = ca.candidate_id
    JOIN job_offers jo ON jo.id = ca.job_offer_id"#;

const APPLICATION_FILTERS: &str = r#"
    WHERE ($1::application_status IS NULL OR ca.status = $1)
      AND ($2::uuid IS NULL OR ca.candidate_id = $2)
      AND ($3::uuid IS NULL OR ca.job_offer_id = $3)
      AND ($4::timestamptz IS NULL OR ca.created_at >= $4)
      AND ($5::timestamptz IS NULL OR ca.created_at <= $5)"#;

/// Owns the candidate application lifecycle.
#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
    directory: DirectoryService,
}

impl ApplicationService {
    pub fn new(pool: PgPool, directory: DirectoryService) -> Self {
        Self { pool, directory }
    }

    pub async fn create(
        &self,
        candidate_id: Uuid,
        payload: CreateApplicationPayload,
    ) -> Result<ApplicationDetails> {
        validate(&payload)?;
        let job_offer_id = payload.job_offer_id;
        let mut tx = self.pool.begin().await?;

        if !self.directory.job_offer_exists(&mut tx, job_offer_id).await? {
            return Err(Error::NotFound(format!("Job offer {} not found", job_offer_id)));
        }
        if !self.directory.candidate_exists(&mut tx, candidate_id).await? {
            return Err(Error::NotFound(format!("Candidate {} not found", candidate_id)));
        }

        let duplicate: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(
                SELECT 1 FROM candidate_applications WHERE job_offer_id = $1 AND candidate_id = $2
            )"#,
        )
        .bind(job_offer_id)
        .bind(candidate_id)
        .fetch_one(&mut *tx)
        .await?;
        if duplicate {
            tracing::warn!(%job_offer_id, %candidate_id, "Duplicate application rejected");
            return Err(Error::Conflict(format!(
                "Candidate {} has already applied to job offer {}",
                candidate_id, job_offer_id
            )));
        }

        let application = sqlx::query_as::<_, CandidateApplication>(
            r#"
            INSERT INTO candidate_applications (job_offer_id, candidate_id, status)
            VALUES ($1, $2, $3)
            RETURNING id, job_offer_id, candidate_id, status, created_at, updated_at
            "#,
        )
        .bind(job_offer_id)
        .bind(candidate_id)
        .bind(ApplicationStatus::ON_SUBMISSION)
        .fetch_one(&mut *tx)
        .await?;

        for (position, answer) in payload.skill_answers.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO application_skill_answers (application_id, position, skill, answer)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(application.id)
            .bind(position as i32)
            .bind(&answer.skill)
            .bind(&answer.answer)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(
            application_id = %application.id,
            %job_offer_id,
            %candidate_id,
            skill_answers = payload.skill_answers.len(),
            "Application submitted"
        );

        self.find_one(application.id).await
    }

    pub async fn find_all(&self, query: ApplicationListQuery) -> Result<ApplicationPage> {
        ensure_date_range(query.start_date, query.end_date)?;
        let page = query.page_request();

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM candidate_applications ca {}",
            APPLICATION_FILTERS
        ))
        .bind(query.status)
        .bind(query.candidate_id)
        .bind(query.job_offer_id)
        .bind(query.start_date)
        .bind(query.end_date)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {} {} {} ORDER BY ca.created_at DESC, ca.id LIMIT $6 OFFSET $7",
            APPLICATION_DETAILS_COLUMNS, APPLICATION_DETAILS_FROM, APPLICATION_FILTERS
        ))
        .bind(query.status)
        .bind(query.candidate_id)
        .bind(query.job_offer_id)
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated::new(
            rows.into_iter().map(ApplicationDetails::from).collect(),
            page,
            total,
        ))
    }

    pub async fn find_one(&self, id: Uuid) -> Result<ApplicationDetails> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {} {} WHERE ca.id = $1",
            APPLICATION_DETAILS_COLUMNS, APPLICATION_DETAILS_FROM
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))?;

        let skill_answers = sqlx::query_as::<_, SkillAnswer>(
            r#"
            SELECT id, application_id, position, skill, answer, created_at
            FROM application_skill_answers
            WHERE application_id = $1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut details = ApplicationDetails::from(row);
        details.skill_answers = Some(skill_answers);
        Ok(details)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateApplicationPayload,
    ) -> Result<ApplicationDetails> {
        validate(&payload)?;
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE candidate_applications
            SET status = COALESCE($2, status), updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(payload.status)
        .fetch_optional(&self.pool)
        .await?;

        if updated.is_none() {
            return Err(not_found(id));
        }
        tracing::info!(application_id = %id, status = ?payload.status, "Application updated");
        self.find_one(id).await
    }

    pub async fn hire(&self, id: Uuid) -> Result<ApplicationDetails> {
        let details = self
            .update(
                id,
                UpdateApplicationPayload {
                    status: Some(ApplicationStatus::Hired),
                },
            )
            .await?;
        tracing::info!(application_id = %id, "Candidate hired");
        Ok(details)
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM candidate_applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(not_found(id));
        }
        tracing::info!(application_id = %id, "Application deleted");
        Ok(())
    }

    pub async fn exists(&self, conn: &mut PgConnection, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM candidate_applications WHERE id = $1)"#,
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(exists)
    }

    /// Current status of every id in `ids` that exists. Rows are locked until the
    /// surrounding transaction ends so a concurrent status change cannot interleave.
    pub async fn statuses_for_update(
        &self,
        conn: &mut PgConnection,
        ids: &[Uuid],
    ) -> Result<Vec<(Uuid, ApplicationStatus)>> {
        let rows: Vec<(Uuid, ApplicationStatus)> = sqlx::query_as(
            r#"SELECT id, status FROM candidate_applications WHERE id = ANY($1) FOR UPDATE"#,
        )
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    /// Moves `APPLIED` rows among `ids` to `IN_PROGRESS` inside the caller's transaction.
    pub async fn promote_to_in_progress(
        &self,
        conn: &mut PgConnection,
        ids: &[Uuid],
    ) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let res = sqlx::query(
            r#"
            UPDATE candidate_applications
            SET status = $2, updated_at = NOW()
            WHERE id = ANY($1) AND status = $3
            "#,
        )
        .bind(ids)
        .bind(ApplicationStatus::InProgress)
        .bind(ApplicationStatus::Applied)
        .execute(&mut *conn)
        .await?;
        Ok(res.rows_affected())
    }

    pub async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM candidate_applications WHERE created_at >= $1 AND created_at < $2"#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn count_by_job_title(&self) -> Result<Vec<JobTitleCount>> {
        let rows = sqlx::query_as::<_, JobTitleCount>(
            r#"
            SELECT jo.title AS job_title, COUNT(ca.id) AS count
            FROM candidate_applications ca
            JOIN job_offers jo ON jo.id = ca.job_offer_id
            GROUP BY jo.title
            ORDER BY count DESC, jo.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Application {} not found", id))
}
