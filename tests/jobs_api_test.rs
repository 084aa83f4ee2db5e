use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    let state = jobboard_backend::AppState::in_memory();
    jobboard_backend::routes::build_router(state, 1000)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            req = req.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create(app: &Router, body: JsonValue) -> JsonValue {
    let (status, json) = send(app, "POST", "/api/jobs", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json["job"].clone()
}

fn ids(list: &JsonValue) -> Vec<String> {
    list["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn job_lifecycle_end_to_end() {
    let app = app();

    let job = create(&app, json!({ "company": "Acme", "role": "Engineer" })).await;
    assert_eq!(job["status"], "SAVED");
    assert!(job["notes"].is_null());
    assert_eq!(job["createdAt"], job["updatedAt"]);
    let id = job["id"].as_str().unwrap().to_string();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/jobs/{}", id),
        Some(json!({ "status": "APPLIED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated = &body["job"];
    assert_eq!(updated["status"], "APPLIED");
    assert_eq!(updated["company"], "Acme");
    assert_eq!(updated["role"], "Engineer");
    assert_eq!(updated["createdAt"], job["createdAt"]);
    let before: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(job["updatedAt"].clone()).unwrap();
    let after: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(updated["updatedAt"].clone()).unwrap();
    assert!(after > before);

    let (status, body) = send(&app, "DELETE", &format!("/api/jobs/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (_, list) = send(&app, "GET", "/api/jobs", None).await;
    assert!(!ids(&list).contains(&id));

    let (status, body) = send(&app, "DELETE", &format!("/api/jobs/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn create_validates_required_fields() {
    let app = app();

    let (status, body) = send(&app, "POST", "/api/jobs", Some(json!({ "company": "  ", "role": "Dev" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("company"));

    let (status, _) = send(&app, "POST", "/api/jobs", Some(json!({ "company": "Acme" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method("POST")
        .uri("/api/jobs")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/jobs/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_defaults_unknown_status_to_saved() {
    let app = app();
    let job = create(&app, json!({ "company": "Acme", "role": "Engineer", "status": "HIRED" })).await;
    assert_eq!(job["status"], "SAVED");
    let job = create(&app, json!({ "company": "Acme", "role": "Engineer", "status": "OFFER" })).await;
    assert_eq!(job["status"], "OFFER");
}

#[tokio::test]
async fn patch_distinguishes_omitted_from_cleared_fields() {
    let app = app();
    let job = create(
        &app,
        json!({
            "company": "Acme",
            "role": "Engineer",
            "notes": "Referral from Sam",
            "salary": "120k",
            "nextAction": "Send portfolio",
            "nextActionAt": "2026-11-02T09:00"
        }),
    )
    .await;
    assert_eq!(job["nextActionAt"], "2026-11-02T09:00:00Z");
    let uri = format!("/api/jobs/{}", job["id"].as_str().unwrap());

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "notes": null, "nextActionAt": "" }))).await;
    assert_eq!(status, StatusCode::OK);
    let updated = &body["job"];
    assert!(updated["notes"].is_null());
    assert!(updated["nextActionAt"].is_null());
    assert_eq!(updated["salary"], "120k");
    assert_eq!(updated["nextAction"], "Send portfolio");

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "role": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": "NOPE", "location": " Remote " }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["status"], "SAVED");
    assert_eq!(body["job"]["location"], "Remote");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/jobs/{}", Uuid::new_v4()),
        Some(json!({ "notes": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_searches_and_sorts() {
    let app = app();
    let acme = create(&app, json!({ "company": "ACME Corp", "role": "Backend", "status": "INTERVIEW" })).await;
    let noted = create(&app, json!({ "company": "Globex", "role": "SRE", "notes": "Ex-acme team" })).await;
    let next = create(&app, json!({ "company": "Initech", "role": "QA", "nextAction": "Ping Acme contact", "status": "INTERVIEW" })).await;
    let other = create(&app, json!({ "company": "Hooli", "role": "Dev", "status": "INTERVIEW" })).await;

    let (_, list) = send(&app, "GET", "/api/jobs?q=acme", None).await;
    let mut got = ids(&list);
    got.sort();
    let mut expected: Vec<String> = [&acme, &noted, &next]
        .iter()
        .map(|j| j["id"].as_str().unwrap().to_string())
        .collect();
    expected.sort();
    assert_eq!(got, expected);

    let (_, list) = send(&app, "GET", "/api/jobs?status=INTERVIEW", None).await;
    assert_eq!(ids(&list).len(), 3);
    assert!(list["jobs"].as_array().unwrap().iter().all(|j| j["status"] == "INTERVIEW"));

    let (_, list) = send(&app, "GET", "/api/jobs?status=INTERVIEW&q=acme", None).await;
    assert_eq!(ids(&list).len(), 2);

    let (_, list) = send(&app, "GET", "/api/jobs?status=bogus", None).await;
    assert_eq!(ids(&list).len(), 4);

    let (_, list) = send(&app, "GET", "/api/jobs?sort=company_asc", None).await;
    let companies: Vec<&str> = list["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["company"].as_str().unwrap())
        .collect();
    assert_eq!(companies, vec!["ACME Corp", "Globex", "Hooli", "Initech"]);

    let (_, list) = send(&app, "GET", "/api/jobs?sort=whatever", None).await;
    let stamps: Vec<chrono::DateTime<chrono::Utc>> = list["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| serde_json::from_value(j["updatedAt"].clone()).unwrap())
        .collect();
    assert_eq!(stamps.len(), 4);
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
    assert!(ids(&list).contains(&other["id"].as_str().unwrap().to_string()));
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn non_string_status_is_treated_as_unrecognized() {
    let app = app();

    let job = create(&app, json!({ "company": "Acme", "role": "Eng", "status": 3 })).await;
    assert_eq!(job["status"], "SAVED");
    let job = create(&app, json!({ "company": "Acme", "role": "Eng", "status": "offer" })).await;
    assert_eq!(job["status"], "SAVED");

    let uri = format!("/api/jobs/{}", job["id"].as_str().unwrap());
    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": true, "notes": "x" }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["job"]["status"], "SAVED");
    assert_eq!(body["job"]["notes"], "x");

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": { "stage": "OFFER" } }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["status"], "SAVED");
}

#[tokio::test]
async fn list_status_filter_ignores_case() {
    let app = app();
    create(&app, json!({ "company": "Acme", "role": "Eng", "status": "OFFER" })).await;
    create(&app, json!({ "company": "Globex", "role": "Eng" })).await;

    let (_, list) = send(&app, "GET", "/api/jobs?status=offer", None).await;
    assert_eq!(ids(&list).len(), 1);
    assert_eq!(list["jobs"][0]["company"], "Acme");
}

#[tokio::test]
async fn field_length_limits_are_enforced() {
    let app = app();

    let at_limit = "a".repeat(200);
    let job = create(&app, json!({ "company": at_limit, "role": "Eng" })).await;
    let uri = format!("/api/jobs/{}", job["id"].as_str().unwrap());

    let too_long = [
        json!({ "company": "a".repeat(201), "role": "Eng" }),
        json!({ "company": "Acme", "role": "r".repeat(201) }),
        json!({ "company": "Acme", "role": "Eng", "url": format!("https://x.io/{}", "p".repeat(2040)) }),
        json!({ "company": "Acme", "role": "Eng", "notes": "n".repeat(10_001) }),
        json!({ "company": "Acme", "role": "Eng", "nextAction": "c".repeat(501) }),
    ];
    for body in too_long {
        let (status, _) = send(&app, "POST", "/api/jobs", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let too_long = [
        json!({ "company": "a".repeat(201) }),
        json!({ "salary": "s".repeat(201) }),
        json!({ "location": "l".repeat(201) }),
        json!({ "notes": "n".repeat(10_001) }),
        json!({ "nextAction": "c".repeat(501) }),
    ];
    for body in too_long {
        let (status, body) = send(&app, "PATCH", &uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "notes": "n".repeat(10_000) }))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["job"]["company"].as_str().unwrap().len(), 200);
}

#[tokio::test]
async fn empty_patch_only_refreshes_updated_at() {
    let app = app();
    let job = create(&app, json!({ "company": "Acme", "role": "Eng", "notes": "keep" })).await;
    let uri = format!("/api/jobs/{}", job["id"].as_str().unwrap());

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let updated = &body["job"];
    let before: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(job["updatedAt"].clone()).unwrap();
    let after: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(updated["updatedAt"].clone()).unwrap();
    assert!(after > before);
    assert_eq!(updated["notes"], "keep");
    assert_eq!(updated["status"], job["status"]);
    assert_eq!(updated["createdAt"], job["createdAt"]);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let app = app();
    create(&app, json!({ "company": "Acme", "role": "Eng" })).await;
    let percent = create(&app, json!({ "company": "50% Off Co", "role": "Eng" })).await;
    let underscore = create(&app, json!({ "company": "Globex", "role": "data_eng" })).await;

    let (_, list) = send(&app, "GET", "/api/jobs?q=%25", None).await;
    assert_eq!(ids(&list), vec![percent["id"].as_str().unwrap().to_string()]);

    let (_, list) = send(&app, "GET", "/api/jobs?q=_", None).await;
    assert_eq!(ids(&list), vec![underscore["id"].as_str().unwrap().to_string()]);
}

#[tokio::test]
async fn company_sort_ignores_case() {
    let app = app();
    for company in ["Zeta", "apple", "Acme"] {
        create(&app, json!({ "company": company, "role": "Eng" })).await;
    }
    let (_, list) = send(&app, "GET", "/api/jobs?sort=company_asc", None).await;
    let companies: Vec<&str> = list["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["company"].as_str().unwrap())
        .collect();
    assert_eq!(companies, vec!["Acme", "apple", "Zeta"]);
}
