use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::directory::{Employee, JobOffer};

/// Read-only access to the job-offer catalog and the candidate/employee profiles.
#[derive(Clone)]
pub struct DirectoryService {
    pool: PgPool,
}

impl DirectoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn job_offer_exists(&self, conn: &mut PgConnection, id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM job_offers WHERE id = $1)"#)
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;
        Ok(exists)
    }

    pub async fn count_open_job_offers(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM job_offers WHERE status = $1"#)
            .bind(JobOffer::OPEN)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn candidate_exists(&self, conn: &mut PgConnection, id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM candidates WHERE id = $1)"#)
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;
        Ok(exists)
    }

    pub async fn get_employee(&self, id: Uuid) -> Result<Employee> {
        sqlx::query_as::<_, Employee>(
            r#"SELECT id, full_name, email, created_at, updated_at FROM employees WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Employee {} not found", id)))
    }

    pub async fn employee_exists(&self, conn: &mut PgConnection, id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM employees WHERE id = $1)"#)
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;
        Ok(exists)
    }

    /// The subset of `ids` that resolve to employees, resolved in one round trip.
    pub async fn existing_employee_ids(
        &self,
        conn: &mut PgConnection,
        ids: &[Uuid],
    ) -> Result<Vec<Uuid>> {
        let found: Vec<Uuid> =
            sqlx::query_scalar(r#"SELECT id FROM employees WHERE id = ANY($1)"#)
                .bind(ids)
                .fetch_all(&mut *conn)
                .await?;
        Ok(found)
    }
}
