use crate::dto::dashboard_dto::DashboardSummary;
use crate::error::Result;
use crate::services::application_service::ApplicationService;
use crate::services::directory_service::DirectoryService;
use crate::services::interview_service::InterviewService;
use crate::services::review_service::ReviewService;
use crate::utils::time::{day_bounds, now};

/// Read-only counters for the hiring dashboard.
#[derive(Clone)]
pub struct DashboardService {
    directory: DirectoryService,
    applications: ApplicationService,
    interviews: InterviewService,
    reviews: ReviewService,
}

impl DashboardService {
    pub fn new(
        directory: DirectoryService,
        applications: ApplicationService,
        interviews: InterviewService,
        reviews: ReviewService,
    ) -> Self {
        Self {
            directory,
            applications,
            interviews,
            reviews,
        }
    }

    /// Every counter is read independently; the snapshot is not transactional.
    pub async fn summary(&self) -> Result<DashboardSummary> {
        let (today_start, today_end) = day_bounds(now());

        let (
            open_job_offers,
            applications_today,
            interviews_awaiting_completion,
            reviews_awaiting_completion,
            applications_by_job_title,
        ) = tokio::try_join!(
            self.directory.count_open_job_offers(),
            self.applications.count_created_between(today_start, today_end),
            self.interviews.count_awaiting_completion(),
            self.reviews.count_pending(),
            self.applications.count_by_job_title(),
        )?;

        tracing::debug!(
            open_job_offers,
            applications_today,
            interviews_awaiting_completion,
            reviews_awaiting_completion,
            "Dashboard summary computed"
        );

        Ok(DashboardSummary {
            open_job_offers,
            applications_today,
            interviews_awaiting_completion,
            reviews_awaiting_completion,
            applications_by_job_title,
        })
    }
}
