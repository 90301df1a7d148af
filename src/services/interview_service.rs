use std::collections::HashMap;

use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::dto::application_dto::{ApplicationDetails, ApplicationRow};
use crate::dto::interview_dto::{
    CreateInterviewPayload, InterviewDetails, InterviewListQuery, InterviewPage,
    InterviewerSummary, UpdateInterviewPayload,
};
use crate::dto::pagination::{PageRequest, Paginated};
use crate::error::{Error, Result};
use crate::models::interview::{Interview, InterviewStatus};
use crate::services::application_service::{
    ApplicationService, APPLICATION_DETAILS_COLUMNS, APPLICATION_DETAILS_FROM,
};
use crate::services::directory_service::DirectoryService;
use crate::utils::validation::{
    applications_to_promote, dedup_ids, ensure_all_found, ensure_date_range,
    ensure_interview_cardinality, validate, Participants,
};

const INTERVIEW_COLUMNS: &str =
    "i.id, i.interview_type, i.scheduled_time, i.meeting_link, i.status, i.created_at, i.updated_at";

const INTERVIEW_FILTERS: &str = r#"
    WHERE ($1::interview_status IS NULL OR i.status = $1)
      AND ($2::uuid IS NULL OR EXISTS (
            SELECT 1 FROM interview_applications ia
            WHERE ia.interview_id = i.id AND ia.application_id = $2))
      AND ($3::uuid IS NULL OR EXISTS (
            SELECT 1 FROM interview_applications ia
            JOIN candidate_applications ca ON ca.id = ia.application_id
            WHERE ia.interview_id = i.id AND ca.candidate_id = $3))
      AND ($4::uuid IS NULL OR EXISTS (
            SELECT 1 FROM interview_interviewers ii
            WHERE ii.interview_id = i.id AND ii.employee_id = $4))
      AND ($5::timestamptz IS NULL OR i.scheduled_time >= $5)
      AND ($6::timestamptz IS NULL OR i.scheduled_time <= $6)"#;

#[derive(FromRow)]
struct LinkedApplicationRow {
    interview_id: Uuid,
    #[sqlx(flatten)]
    application: ApplicationRow,
}

#[derive(FromRow)]
struct InterviewerRow {
    interview_id: Uuid,
    id: Uuid,
    full_name: String,
    email: String,
}

/// Owns interviews and their links to applications and interviewers.
#[derive(Clone)]
pub struct InterviewService {
    pool: PgPool,
    applications: ApplicationService,
    directory: DirectoryService,
}

impl InterviewService {
    pub fn new(pool: PgPool, applications: ApplicationService, directory: DirectoryService) -> Self {
        Self {
            pool,
            applications,
            directory,
        }
    }

    pub async fn create(&self, payload: CreateInterviewPayload) -> Result<InterviewDetails> {
        validate(&payload)?;
        ensure_interview_cardinality(payload.interview_type, &payload.application_ids)?;
        let application_ids = dedup_ids(&payload.application_ids);
        let interviewer_ids = dedup_ids(&payload.interviewer_ids);

        let mut tx = self.pool.begin().await?;

        let statuses = self
            .applications
            .statuses_for_update(&mut tx, &application_ids)
            .await?;
        let found: Vec<Uuid> = statuses.iter().map(|(id, _)| *id).collect();
        ensure_all_found("Applications", &application_ids, &found)?;

        let found = self
            .directory
            .existing_employee_ids(&mut tx, &interviewer_ids)
            .await?;
        ensure_all_found("Interviewers", &interviewer_ids, &found)?;

        let promoted = self
            .applications
            .promote_to_in_progress(&mut tx, &applications_to_promote(&statuses))
            .await?;

        let interview = sqlx::query_as::<_, Interview>(
            r#"
            INSERT INTO interviews (interview_type, scheduled_time, meeting_link, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, interview_type, scheduled_time, meeting_link, status, created_at, updated_at
            "#,
        )
        .bind(payload.interview_type)
        .bind(payload.scheduled_time)
        .bind(&payload.meeting_link)
        .bind(payload.status.unwrap_or_default())
        .fetch_one(&mut *tx)
        .await?;

        link_applications(&mut tx, interview.id, &application_ids).await?;
        link_interviewers(&mut tx, interview.id, &interviewer_ids).await?;

        tx.commit().await?;
        tracing::info!(
            interview_id = %interview.id,
            interview_type = ?interview.interview_type,
            applications = application_ids.len(),
            interviewers = interviewer_ids.len(),
            promoted,
            "Interview scheduled"
        );

        self.find_one(interview.id).await
    }

    pub async fn find_all(&self, query: InterviewListQuery) -> Result<InterviewPage> {
        ensure_date_range(query.start_date, query.end_date)?;
        let page = query.page_request();

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM interviews i {}",
            INTERVIEW_FILTERS
        ))
        .bind(query.status)
        .bind(query.application_id)
        .bind(query.candidate_id)
        .bind(query.employee_id)
        .bind(query.start_date)
        .bind(query.end_date)
        .fetch_one(&self.pool)
        .await?;

        let interviews = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {} FROM interviews i {} ORDER BY i.scheduled_time ASC, i.id LIMIT $7 OFFSET $8",
            INTERVIEW_COLUMNS, INTERVIEW_FILTERS
        ))
        .bind(query.status)
        .bind(query.application_id)
        .bind(query.candidate_id)
        .bind(query.employee_id)
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Paginated::new(self.hydrate(interviews).await?, page, total))
    }

    pub async fn find_by_application(
        &self,
        application_id: Uuid,
        page: PageRequest,
    ) -> Result<InterviewPage> {
        self.find_all(InterviewListQuery {
            application_id: Some(application_id),
            ..paged(page)
        })
        .await
    }

    pub async fn find_by_interviewer(
        &self,
        employee_id: Uuid,
        page: PageRequest,
    ) -> Result<InterviewPage> {
        self.find_all(InterviewListQuery {
            employee_id: Some(employee_id),
            ..paged(page)
        })
        .await
    }

    pub async fn find_by_candidate(
        &self,
        candidate_id: Uuid,
        page: PageRequest,
    ) -> Result<InterviewPage> {
        self.find_all(InterviewListQuery {
            candidate_id: Some(candidate_id),
            ..paged(page)
        })
        .await
    }

    pub async fn find_one(&self, id: Uuid) -> Result<InterviewDetails> {
        let interview = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {} FROM interviews i WHERE i.id = $1",
            INTERVIEW_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))?;

        self.hydrate(vec![interview])
            .await?
            .pop()
            .ok_or_else(|| not_found(id))
    }

    pub async fn update(&self, id: Uuid, payload: UpdateInterviewPayload) -> Result<InterviewDetails> {
        validate(&payload)?;
        let mut tx = self.pool.begin().await?;

        if self.lock(&mut tx, id).await?.is_none() {
            return Err(not_found(id));
        }

        let application_ids = match &payload.application_ids {
            Some(ids) => {
                let ids = dedup_ids(ids);
                let found: Vec<Uuid> = self
                    .applications
                    .statuses_for_update(&mut tx, &ids)
                    .await?
                    .into_iter()
                    .map(|(id, _)| id)
                    .collect();
                ensure_all_found("Applications", &ids, &found)?;
                Some(ids)
            }
            None => None,
        };

        let interviewer_ids = match &payload.interviewer_ids {
            Some(ids) => {
                let ids = dedup_ids(ids);
                let found = self.directory.existing_employee_ids(&mut tx, &ids).await?;
                ensure_all_found("Interviewers", &ids, &found)?;
                Some(ids)
            }
            None => None,
        };

        sqlx::query(
            r#"
            UPDATE interviews
            SET
                interview_type = COALESCE($2, interview_type),
                scheduled_time = COALESCE($3, scheduled_time),
                meeting_link = CASE WHEN $4 THEN $5 ELSE meeting_link END,
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(payload.interview_type)
        .bind(payload.scheduled_time)
        .bind(payload.meeting_link.is_some())
        .bind(payload.meeting_link.clone().flatten())
        .bind(payload.status)
        .execute(&mut *tx)
        .await?;

        if let Some(ids) = &application_ids {
            sqlx::query("DELETE FROM interview_applications WHERE interview_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_applications(&mut tx, id, ids).await?;
        }

        if let Some(ids) = &interviewer_ids {
            sqlx::query("DELETE FROM interview_interviewers WHERE interview_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_interviewers(&mut tx, id, ids).await?;
        }

        tx.commit().await?;
        tracing::info!(
            interview_id = %id,
            replaced_applications = application_ids.is_some(),
            replaced_interviewers = interviewer_ids.is_some(),
            "Interview updated"
        );

        self.find_one(id).await
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM interviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(not_found(id));
        }
        tracing::info!(interview_id = %id, "Interview deleted");
        Ok(())
    }

    /// Loads an interview and holds a share lock on it for the rest of the transaction,
    /// so its participants cannot be replaced while a caller inspects them.
    pub async fn get_locked_for_share(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Interview>> {
        let interview = sqlx::query_as::<_, Interview>(&format!(
            "SELECT {} FROM interviews i WHERE i.id = $1 FOR SHARE",
            INTERVIEW_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(interview)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM interviews WHERE id = $1)"#)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn participants(&self, conn: &mut PgConnection, id: Uuid) -> Result<Participants> {
        let interviewer_ids: Vec<Uuid> = sqlx::query_scalar(
            r#"SELECT employee_id FROM interview_interviewers WHERE interview_id = $1"#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

        let application_ids: Vec<Uuid> = sqlx::query_scalar(
            r#"SELECT application_id FROM interview_applications WHERE interview_id = $1"#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Participants {
            interviewer_ids,
            application_ids,
        })
    }

    pub async fn count_awaiting_completion(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM interviews WHERE status = $1 OR status = $2"#,
        )
        .bind(InterviewStatus::AWAITING_COMPLETION[0])
        .bind(InterviewStatus::AWAITING_COMPLETION[1])
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Attaches applications (with candidate and job offer) and interviewers, preserving
    /// the order of `interviews`.
    pub async fn hydrate(&self, interviews: Vec<Interview>) -> Result<Vec<InterviewDetails>> {
        if interviews.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = interviews.iter().map(|i| i.id).collect();

        let applications_sql = format!(
            "SELECT ia.interview_id, {} {} JOIN interview_applications ia ON ia.application_id = ca.id \
             WHERE ia.interview_id = ANY($1) ORDER BY ca.created_at, ca.id",
            APPLICATION_DETAILS_COLUMNS, APPLICATION_DETAILS_FROM
        );
        let applications_query = sqlx::query_as::<_, LinkedApplicationRow>(&applications_sql)
            .bind(&ids)
            .fetch_all(&self.pool);
        let interviewers_query = sqlx::query_as::<_, InterviewerRow>(
            r#"
            SELECT ii.interview_id, e.id, e.full_name, e.email
            FROM interview_interviewers ii
            JOIN employees e ON e.id = ii.employee_id
            WHERE ii.interview_id = ANY($1)
            ORDER BY e.full_name, e.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool);

        let (application_rows, interviewer_rows) =
            tokio::try_join!(applications_query, interviewers_query)?;

        let mut applications: HashMap<Uuid, Vec<ApplicationDetails>> = HashMap::new();
        for row in application_rows {
            applications
                .entry(row.interview_id)
                .or_default()
                .push(row.application.into());
        }

        let mut interviewers: HashMap<Uuid, Vec<InterviewerSummary>> = HashMap::new();
        for row in interviewer_rows {
            interviewers
                .entry(row.interview_id)
                .or_default()
                .push(InterviewerSummary {
                    id: row.id,
                    full_name: row.full_name,
                    email: row.email,
                });
        }

        Ok(interviews
            .into_iter()
            .map(|interview| InterviewDetails {
                applications: applications.remove(&interview.id).unwrap_or_default(),
                interviewers: interviewers.remove(&interview.id).unwrap_or_default(),
                interview,
            })
            .collect())
    }

    async fn lock(&self, conn: &mut PgConnection, id: Uuid) -> Result<Option<Uuid>> {
        let locked: Option<Uuid> =
            sqlx::query_scalar(r#"SELECT id FROM interviews WHERE id = $1 FOR UPDATE"#)
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(locked)
    }
}

fn paged(page: PageRequest) -> InterviewListQuery {
    InterviewListQuery {
        page: Some(page.page),
        limit: Some(page.limit),
        ..Default::default()
    }
}

async fn link_applications(conn: &mut PgConnection, interview_id: Uuid, ids: &[Uuid]) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO interview_applications (interview_id, application_id)
        SELECT $1, UNNEST($2::uuid[])
        "#,
    )
    .bind(interview_id)
    .bind(ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn link_interviewers(conn: &mut PgConnection, interview_id: Uuid, ids: &[Uuid]) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO interview_interviewers (interview_id, employee_id)
        SELECT $1, UNNEST($2::uuid[])
        "#,
    )
    .bind(interview_id)
    .bind(ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Interview {} not found", id))
}
