pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use axum::{extract::DefaultBodyLimit, Router};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{
    application_service::ApplicationService, dashboard_service::DashboardService,
    directory_service::DirectoryService, interview_service::InterviewService,
    review_service::ReviewService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub directory_service: DirectoryService,
    pub application_service: ApplicationService,
    pub interview_service: InterviewService,
    pub review_service: ReviewService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let directory_service = DirectoryService::new(pool.clone());
        let application_service = ApplicationService::new(pool.clone(), directory_service.clone());
        let interview_service = InterviewService::new(
            pool.clone(),
            application_service.clone(),
            directory_service.clone(),
        );
        let review_service = ReviewService::new(
            pool.clone(),
            directory_service.clone(),
            application_service.clone(),
            interview_service.clone(),
        );
        let dashboard_service = DashboardService::new(
            directory_service.clone(),
            application_service.clone(),
            interview_service.clone(),
            review_service.clone(),
        );

        Self {
            pool,
            directory_service,
            application_service,
            interview_service,
            review_service,
            dashboard_service,
        }
    }
}

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// The full HTTP application with its cross-cutting layers.
pub fn app(state: AppState) -> Router {
    routes::router()
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
