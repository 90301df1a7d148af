use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};

use crate::middleware::auth::{authenticate, require_employee};
use crate::AppState;

pub mod applications;
pub mod dashboard;
pub mod health;
pub mod interviews;
pub mod reviews;

/// Every endpoint of the service. Applications and interviews are open to any
/// authenticated caller with per-handler employee checks; reviews and the dashboard
/// are employee-only as a whole.
pub fn router() -> Router<AppState> {
    let authenticated = Router::new()
        .route(
            "/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route("/applications/hire", post(applications::hire_candidate))
        .route(
            "/applications/:id",
            get(applications::get_application)
                .patch(applications::update_application)
                .delete(applications::delete_application),
        )
        .route(
            "/interviews",
            get(interviews::list_interviews).post(interviews::create_interview),
        )
        .route(
            "/interviews/:id",
            get(interviews::get_interview)
                .patch(interviews::update_interview)
                .delete(interviews::delete_interview),
        )
        .route(
            "/interviews/candidate/:id",
            get(interviews::list_candidate_interviews),
        )
        .route(
            "/interviews/application/:id",
            get(interviews::list_application_interviews),
        )
        .route(
            "/interviews/interviewer/:id",
            get(interviews::list_interviewer_interviews),
        )
        .layer(from_fn(authenticate));

    let employee_only = Router::new()
        .route("/reviews", post(reviews::create_review))
        .route("/reviews/pending", get(reviews::list_pending_reviews))
        .route("/reviews/completed", get(reviews::list_completed_reviews))
        .route(
            "/reviews/interview/:id",
            get(reviews::list_interview_reviews),
        )
        .route(
            "/reviews/employee/:employee_id/interview/:interview_id",
            get(reviews::list_employee_interview_reviews),
        )
        .route(
            "/reviews/application/:id",
            get(reviews::list_application_reviews),
        )
        .route(
            "/reviews/:id",
            get(reviews::get_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route("/dashboard", get(dashboard::get_dashboard))
        .layer(from_fn(require_employee));

    Router::new()
        .route("/health", get(health::health))
        .merge(authenticated)
        .merge(employee_only)
}
