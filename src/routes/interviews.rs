use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::interview_dto::{
        CreateInterviewPayload, InterviewDetails, InterviewListQuery, InterviewPage,
        UpdateInterviewPayload,
    },
    dto::pagination::PageQuery,
    error::Result,
    middleware::auth::Caller,
    utils::validation::validate,
    AppState,
};

#[utoipa::path(
    post,
    path = "/interviews",
    request_body = CreateInterviewPayload,
    responses(
        (status = 201, description = "Interview scheduled", body = Json<InterviewDetails>),
        (status = 400, description = "Invalid payload or cardinality violation"),
        (status = 403, description = "Employee access required"),
        (status = 404, description = "Applications or interviewers not found")
    )
)]
#[axum::debug_handler]
pub async fn create_interview(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<CreateInterviewPayload>,
) -> Result<impl IntoResponse> {
    caller.ensure_employee()?;
    let interview = state.interview_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

#[utoipa::path(
    get,
    path = "/interviews",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("application_id" = Option<Uuid>, Query, description = "Filter by linked application"),
        ("candidate_id" = Option<Uuid>, Query, description = "Filter by candidate"),
        ("employee_id" = Option<Uuid>, Query, description = "Filter by interviewer"),
        ("start_date" = Option<String>, Query, description = "Scheduled at or after"),
        ("end_date" = Option<String>, Query, description = "Scheduled at or before")
    ),
    responses(
        (status = 200, description = "Interviews", body = Json<InterviewPage>)
    )
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Query(query): Query<InterviewListQuery>,
) -> Result<impl IntoResponse> {
    validate(&query)?;
    let page = state.interview_service.find_all(query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/interviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Interview found", body = Json<InterviewDetails>),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interview = state.interview_service.find_one(id).await?;
    Ok(Json(interview))
}

#[utoipa::path(
    patch,
    path = "/interviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    request_body = UpdateInterviewPayload,
    responses(
        (status = 200, description = "Interview updated", body = Json<InterviewDetails>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Employee access required"),
        (status = 404, description = "Interview, applications or interviewers not found")
    )
)]
#[axum::debug_handler]
pub async fn update_interview(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInterviewPayload>,
) -> Result<impl IntoResponse> {
    caller.ensure_employee()?;
    let interview = state.interview_service.update(id, payload).await?;
    Ok(Json(interview))
}

#[utoipa::path(
    delete,
    path = "/interviews/{id}",
    params(
        ("id" = Uuid, Path, description = "Interview ID")
    ),
    responses(
        (status = 204, description = "Interview deleted"),
        (status = 403, description = "Employee access required"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_interview(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    caller.ensure_employee()?;
    state.interview_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/interviews/candidate/{id}",
    params(
        ("id" = Uuid, Path, description = "Candidate ID"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Interviews involving the candidate", body = Json<InterviewPage>)
    )
)]
#[axum::debug_handler]
pub async fn list_candidate_interviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    validate(&page)?;
    let interviews = state
        .interview_service
        .find_by_candidate(id, page.into())
        .await?;
    Ok(Json(interviews))
}

#[utoipa::path(
    get,
    path = "/interviews/application/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Interviews linked to the application", body = Json<InterviewPage>)
    )
)]
#[axum::debug_handler]
pub async fn list_application_interviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    validate(&page)?;
    let interviews = state
        .interview_service
        .find_by_application(id, page.into())
        .await?;
    Ok(Json(interviews))
}

#[utoipa::path(
    get,
    path = "/interviews/interviewer/{id}",
    params(
        ("id" = Uuid, Path, description = "Employee ID"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Interviews the employee sits on", body = Json<InterviewPage>)
    )
)]
#[axum::debug_handler]
pub async fn list_interviewer_interviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    validate(&page)?;
    let interviews = state
        .interview_service
        .find_by_interviewer(id, page.into())
        .await?;
    Ok(Json(interviews))
}
