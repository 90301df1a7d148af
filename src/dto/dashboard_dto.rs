use serde::{Deserialize, Serialize};

use crate::dto::application_dto::JobTitleCount;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub open_job_offers: i64,
    pub applications_today: i64,
    pub interviews_awaiting_completion: i64,
    pub reviews_awaiting_completion: i64,
    pub applications_by_job_title: Vec<JobTitleCount>,
}
