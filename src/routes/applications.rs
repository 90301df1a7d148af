use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{
        ApplicationDetails, ApplicationListQuery, ApplicationPage, CreateApplicationPayload,
        HireApplicationPayload, UpdateApplicationPayload,
    },
    error::{Error, Result},
    middleware::auth::Caller,
    utils::validation::validate,
    AppState,
};

/// Candidates apply as themselves; employees must name the candidate they file for.
fn applicant_for(caller: &Caller, payload: &CreateApplicationPayload) -> Result<Uuid> {
    if caller.is_employee() {
        payload.candidate_id.ok_or_else(|| {
            Error::BadRequest("candidate_id is required when an employee submits".to_string())
        })
    } else {
        caller.acting_as(payload.candidate_id)
    }
}

#[utoipa::path(
    post,
    path = "/applications",
    request_body = CreateApplicationPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<ApplicationDetails>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Job offer or candidate not found"),
        (status = 409, description = "Candidate already applied to this job offer")
    )
)]
#[axum::debug_handler]
pub async fn create_application(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let candidate_id = applicant_for(&caller, &payload)?;
    let application = state.application_service.create(candidate_id, payload).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/applications",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("candidate_id" = Option<Uuid>, Query, description = "Filter by candidate"),
        ("job_offer_id" = Option<Uuid>, Query, description = "Filter by job offer"),
        ("start_date" = Option<String>, Query, description = "Created at or after"),
        ("end_date" = Option<String>, Query, description = "Created at or before")
    ),
    responses(
        (status = 200, description = "Applications", body = Json<ApplicationPage>)
    )
)]
#[axum::debug_handler]
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    validate(&query)?;
    let page = state.application_service.find_all(query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application found", body = Json<ApplicationDetails>),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.find_one(id).await?;
    Ok(Json(application))
}

#[utoipa::path(
    patch,
    path = "/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationPayload,
    responses(
        (status = 200, description = "Application updated", body = Json<ApplicationDetails>),
        (status = 403, description = "Employee access required"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApplicationPayload>,
) -> Result<impl IntoResponse> {
    caller.ensure_employee()?;
    let application = state.application_service.update(id, payload).await?;
    Ok(Json(application))
}

#[utoipa::path(
    post,
    path = "/applications/hire",
    request_body = HireApplicationPayload,
    responses(
        (status = 200, description = "Candidate hired", body = Json<ApplicationDetails>),
        (status = 403, description = "Employee access required"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn hire_candidate(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<HireApplicationPayload>,
) -> Result<impl IntoResponse> {
    caller.ensure_employee()?;
    let application = state.application_service.hire(payload.application_id).await?;
    Ok(Json(application))
}

#[utoipa::path(
    delete,
    path = "/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 403, description = "Employee access required"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_application(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    caller.ensure_employee()?;
    state.application_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
