mod common;

use axum::http::StatusCode;
use common::{bearer, offline_app, send};
use hiring_backend::middleware::auth::UserType;
use serde_json::json;
use uuid::Uuid;

fn interview_body(interview_type: &str, applications: usize) -> serde_json::Value {
    let application_ids: Vec<Uuid> = (0..applications).map(|_| Uuid::new_v4()).collect();
    json!({
        "type": interview_type,
        "scheduled_time": "2026-11-02T10:00:00Z",
        "meeting_link": "https://meet.example.com/abc",
        "application_ids": application_ids,
        "interviewer_ids": [Uuid::new_v4()]
    })
}

#[tokio::test]
async fn requests_without_a_valid_token_are_unauthorized() {
    let app = offline_app();

    let (status, body) = send(&app, "GET", "/applications", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_authorization");

    let (status, body) = send(&app, "GET", "/interviews", Some("Bearer not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");

    let (status, _) = send(&app, "GET", "/reviews/pending", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn candidates_cannot_use_employee_operations() {
    let app = offline_app();
    let candidate = bearer(Uuid::new_v4(), UserType::Candidate);

    let (status, _) = send(
        &app,
        "POST",
        "/interviews",
        Some(&candidate),
        Some(interview_body("GROUP", 2)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/dashboard", Some(&candidate), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/reviews/{}", Uuid::new_v4()),
        Some(&candidate),
        Some(json!({ "score": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/applications/hire",
        Some(&candidate),
        Some(json!({ "application_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn candidate_cannot_apply_for_someone_else() {
    let app = offline_app();
    let candidate = bearer(Uuid::new_v4(), UserType::Candidate);

    let (status, _) = send(
        &app,
        "POST",
        "/applications",
        Some(&candidate),
        Some(json!({ "job_offer_id": Uuid::new_v4(), "candidate_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn employee_application_must_name_a_candidate() {
    let app = offline_app();
    let employee = bearer(Uuid::new_v4(), UserType::Employee);

    let (status, body) = send(
        &app,
        "POST",
        "/applications",
        Some(&employee),
        Some(json!({ "job_offer_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("candidate_id"));
}

#[tokio::test]
async fn individual_interview_with_two_applications_is_rejected() {
    let app = offline_app();
    let employee = bearer(Uuid::new_v4(), UserType::Employee);

    let (status, body) = send(
        &app,
        "POST",
        "/interviews",
        Some(&employee),
        Some(interview_body("INDIVIDUAL", 2)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("INDIVIDUAL"));
}

#[tokio::test]
async fn interview_needs_at_least_one_interviewer() {
    let app = offline_app();
    let employee = bearer(Uuid::new_v4(), UserType::Employee);

    let mut body = interview_body("GROUP", 1);
    body["interviewer_ids"] = json!([]);
    let (status, _) = send(&app, "POST", "/interviews", Some(&employee), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn review_score_outside_range_is_rejected() {
    let app = offline_app();
    let employee = bearer(Uuid::new_v4(), UserType::Employee);

    for score in [0, 11] {
        let (status, _) = send(
            &app,
            "POST",
            "/reviews",
            Some(&employee),
            Some(json!({
                "interview_id": Uuid::new_v4(),
                "candidate_application_id": Uuid::new_v4(),
                "score": score
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "score {}", score);
    }
}

#[tokio::test]
async fn review_cannot_be_filed_for_another_employee() {
    let app = offline_app();
    let employee = bearer(Uuid::new_v4(), UserType::Employee);

    let (status, _) = send(
        &app,
        "POST",
        "/reviews",
        Some(&employee),
        Some(json!({
            "employee_id": Uuid::new_v4(),
            "interview_id": Uuid::new_v4(),
            "candidate_application_id": Uuid::new_v4()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn listing_rejects_zero_page() {
    let app = offline_app();
    let employee = bearer(Uuid::new_v4(), UserType::Employee);

    let (status, _) = send(&app, "GET", "/interviews?page=0", Some(&employee), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/reviews/completed?limit=0", Some(&employee), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_rejects_limit_above_one_hundred() {
    let app = offline_app();
    let employee = bearer(Uuid::new_v4(), UserType::Employee);

    for uri in [
        "/interviews?limit=101",
        "/applications?limit=500",
        "/reviews/pending?limit=101",
        "/reviews/completed?limit=500",
    ] {
        let (status, body) = send(&app, "GET", uri, Some(&employee), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].as_str().unwrap().contains("limit"), "{}", uri);
    }
}

#[tokio::test]
async fn partial_updates_validate_supplied_values() {
    let app = offline_app();
    let employee = bearer(Uuid::new_v4(), UserType::Employee);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/interviews/{}", Uuid::new_v4()),
        Some(&employee),
        Some(json!({ "meeting_link": "not a url" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/reviews/{}", Uuid::new_v4()),
        Some(&employee),
        Some(json!({ "score": 11 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
