use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::interview_dto::InterviewPage,
    dto::pagination::PageQuery,
    dto::review_dto::{CreateReviewPayload, ReviewDetails, ReviewPage, UpdateReviewPayload},
    error::Result,
    middleware::auth::Caller,
    utils::validation::validate,
    AppState,
};

#[utoipa::path(
    post,
    path = "/reviews",
    request_body = CreateReviewPayload,
    responses(
        (status = 201, description = "Review filed", body = Json<ReviewDetails>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Reviews can only be filed by the calling employee"),
        (status = 404, description = "Employee, interview or application not found"),
        (status = 409, description = "Not a participant, or review already exists")
    )
)]
#[axum::debug_handler]
pub async fn create_review(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<CreateReviewPayload>,
) -> Result<impl IntoResponse> {
    let employee_id = caller.acting_as(payload.employee_id)?;
    let review = state.review_service.create(employee_id, payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[utoipa::path(
    get,
    path = "/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review found", body = Json<ReviewDetails>),
        (status = 404, description = "Review not found")
    )
)]
#[axum::debug_handler]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let review = state.review_service.find_one(id).await?;
    Ok(Json(review))
}

#[utoipa::path(
    get,
    path = "/reviews/interview/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Reviews filed for the interview", body = Json<Vec<ReviewDetails>>),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn list_interview_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let reviews = state.review_service.find_by_interview(id).await?;
    Ok(Json(reviews))
}

#[utoipa::path(
    get,
    path = "/reviews/employee/{employee_id}/interview/{interview_id}",
    params(
        ("employee_id" = Uuid, Path, description = "Employee ID"),
        ("interview_id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Reviews by the employee for the interview", body = Json<Vec<ReviewDetails>>),
        (status = 400, description = "Employee is not an interviewer for the interview"),
        (status = 404, description = "Employee or interview not found")
    )
)]
#[axum::debug_handler]
pub async fn list_employee_interview_reviews(
    State(state): State<AppState>,
    Path((employee_id, interview_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let reviews = state
        .review_service
        .find_by_employee_and_interview(employee_id, interview_id)
        .await?;
    Ok(Json(reviews))
}

#[utoipa::path(
    get,
    path = "/reviews/application/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Reviews of the application", body = Json<Vec<ReviewDetails>>),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn list_application_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let reviews = state.review_service.find_by_candidate_application(id).await?;
    Ok(Json(reviews))
}

#[utoipa::path(
    get,
    path = "/reviews/pending",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Past interviews the caller has not reviewed yet", body = Json<InterviewPage>)
    )
)]
#[axum::debug_handler]
pub async fn list_pending_reviews(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    validate(&page)?;
    let interviews = state
        .review_service
        .find_interviews_pending_review(caller.entity_id, page.into())
        .await?;
    Ok(Json(interviews))
}

#[utoipa::path(
    get,
    path = "/reviews/completed",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Reviews filed by the caller", body = Json<ReviewPage>)
    )
)]
#[axum::debug_handler]
pub async fn list_completed_reviews(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    validate(&page)?;
    let reviews = state
        .review_service
        .find_my_completed_reviews(caller.entity_id, page.into())
        .await?;
    Ok(Json(reviews))
}

#[utoipa::path(
    patch,
    path = "/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    request_body = UpdateReviewPayload,
    responses(
        (status = 200, description = "Review updated", body = Json<ReviewDetails>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Only the author may edit a review"),
        (status = 404, description = "Review not found")
    )
)]
#[axum::debug_handler]
pub async fn update_review(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReviewPayload>,
) -> Result<impl IntoResponse> {
    let review = state
        .review_service
        .update(id, caller.entity_id, payload)
        .await?;
    Ok(Json(review))
}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 404, description = "Review not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.review_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
