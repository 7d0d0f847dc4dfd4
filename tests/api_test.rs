use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use pmkit::api::{create_router, AppState, USER_HEADER};
use pmkit::config::ServerConfig;
use pmkit::db::Database;

fn server() -> TestServer {
    let db = Database::open_memory().expect("Failed to create test database");
    db.migrate().expect("Failed to migrate test database");
    let config = ServerConfig {
        simulation_step: Duration::from_millis(10),
        ..ServerConfig::default()
    };
    TestServer::new(create_router(AppState::new(db, &config))).expect("Failed to start test server")
}

async fn register(server: &TestServer, email: &str) {
    server
        .post("/api/users")
        .json(&json!({ "email": email }))
        .await
        .assert_status(StatusCode::CREATED);
}

fn acting(email: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(USER_HEADER),
        HeaderValue::from_static(email),
    )
}

async fn sign_in(server: &mut TestServer, email: &str) {
    register(server, email).await;
    server.add_header(
        HeaderName::from_static(USER_HEADER),
        HeaderValue::from_str(email).expect("valid header value"),
    );
}

fn prd(name: &str) -> Value {
    json!({
        "product_name": name,
        "document_owner": "Dana",
        "overview": "Self-serve analytics",
        "problem_statement": "PMs wait days for reports",
        "target_audience": "Product managers",
        "features": "Dashboards",
        "timeline": "Q3",
        "success_metrics": "Weekly active PMs",
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let server = server();
    let body: Value = server.get("/api/health").await.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn records_require_a_known_user() {
    let server = server();
    server
        .get("/api/cohorts")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let (name, value) = acting("ghost@example.com");
    server
        .get("/api/cohorts")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cohort_crud_and_analysis() {
    let mut server = server();
    sign_in(&mut server, "pm@example.com").await;

    let created: Value = server
        .post("/api/cohorts")
        .json(&json!({ "cohort_date": "2026-01-01", "total_users": 100, "retained_users": 50 }))
        .await
        .json();
    let id = created["id"].as_str().expect("id").to_string();

    server
        .post("/api/cohorts")
        .json(&json!({ "cohort_date": "2026-02-01", "total_users": 100, "retained_users": 60 }))
        .await
        .assert_status(StatusCode::CREATED);

    let analysis: Value = server.get("/api/cohorts/analysis").await.json();
    assert_eq!(analysis["points"][0]["rate"], 50.0);
    assert_eq!(analysis["points"][1]["change"], 20.0);
    assert_eq!(analysis["points"][1]["outcome"], "Positive");

    let updated: Value = server
        .put(&format!("/api/cohorts/{id}"))
        .json(&json!({ "cohort_date": "2026-01-01", "total_users": 200, "retained_users": 50 }))
        .await
        .json();
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["total_users"], 200);

    server
        .delete(&format!("/api/cohorts/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/api/cohorts/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_fields_are_listed_and_nothing_is_saved() {
    let mut server = server();
    sign_in(&mut server, "pm@example.com").await;

    let response = server
        .post("/api/stickiness")
        .json(&json!({ "analysis_date": "2026-01-01" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["fields"], json!(["dau", "mau"]));

    let list: Value = server.get("/api/stickiness").await.json();
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn rejected_cohort_edit_leaves_the_record_unchanged() {
    let mut server = server();
    sign_in(&mut server, "pm@example.com").await;

    let created: Value = server
        .post("/api/cohorts")
        .json(&json!({ "cohort_date": "2026-01-01", "total_users": 100, "retained_users": 50 }))
        .await
        .json();
    let id = created["id"].as_str().expect("id").to_string();

    let response = server
        .put(&format!("/api/cohorts/{id}"))
        .json(&json!({ "cohort_date": "2026-03-01", "retained_users": 10 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["fields"], json!(["total_users"]));

    let stored: Value = server.get(&format!("/api/cohorts/{id}")).await.json();
    assert_eq!(stored["cohort_date"], "2026-01-01");
    assert_eq!(stored["total_users"], 100);
    assert_eq!(stored["retained_users"], 50);
}

#[tokio::test]
async fn stickiness_edit_keeps_the_id() {
    let mut server = server();
    sign_in(&mut server, "pm@example.com").await;

    let created: Value = server
        .post("/api/stickiness")
        .json(&json!({ "analysis_date": "2026-01-01", "dau": 200, "mau": 1000 }))
        .await
        .json();
    let id = created["id"].as_str().expect("id").to_string();

    let updated: Value = server
        .put(&format!("/api/stickiness/{id}"))
        .json(&json!({ "analysis_date": "2026-01-01", "dau": 300, "mau": 1000 }))
        .await
        .json();
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["dau"], 300);

    let list: Value = server.get("/api/stickiness").await.json();
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn prd_edit_with_blank_required_field_is_rejected() {
    let mut server = server();
    sign_in(&mut server, "pm@example.com").await;
    let created: Value = server.post("/api/prds").json(&prd("Insights")).await.json();
    let id = created["id"].as_str().expect("id").to_string();

    let mut edit = prd("   ");
    edit["version"] = json!("2.0");
    let response = server.put(&format!("/api/prds/{id}")).json(&edit).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["fields"], json!(["product_name"]));

    let stored: Value = server.get(&format!("/api/prds/{id}")).await.json();
    assert_eq!(stored["product_name"], "Insights");
    assert_eq!(stored["version"], "");

    let mut edit = prd("Insights");
    edit["version"] = json!("2.0");
    let updated: Value = server.put(&format!("/api/prds/{id}")).json(&edit).await.json();
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["version"], "2.0");
}

#[tokio::test]
async fn uat_form_edit_keeps_the_id() {
    let mut server = server();
    sign_in(&mut server, "pm@example.com").await;

    let mut form = json!({
        "project_name": "Checkout",
        "test_plan_title": "Checkout UAT",
        "prepared_by": "Dana",
        "test_objective": "Confirm the new checkout",
        "scope": "Web checkout",
        "exit_criteria": "No blocker defects",
        "test_scenarios": "Pay by card",
    });
    let created: Value = server.post("/api/uat-forms").json(&form).await.json();
    let id = created["id"].as_str().expect("id").to_string();

    form["test_scenarios"] = json!("Pay by card\nPay by wallet");
    let updated: Value = server
        .put(&format!("/api/uat-forms/{id}"))
        .json(&form)
        .await
        .json();
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["test_scenarios"], "Pay by card\nPay by wallet");

    let list: Value = server.get("/api/uat-forms").await.json();
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn roadmap_edit_keeps_the_id_and_updates_columns() {
    let mut server = server();
    sign_in(&mut server, "pm@example.com").await;

    let created: Value = server
        .post("/api/roadmaps")
        .json(&json!({
            "roadmap_header": "2026",
            "format": "timeline",
            "column_count": 1,
            "roadmap": [{ "title": "Q1", "goals": [] }],
        }))
        .await
        .json();
    let id = created["id"].as_str().expect("id").to_string();

    let updated: Value = server
        .put(&format!("/api/roadmaps/{id}"))
        .json(&json!({
            "roadmap_header": "2026",
            "format": "timeline",
            "column_count": 2,
            "roadmap": [{ "title": "Q1", "goals": [] }, { "title": "Q2", "goals": [] }],
        }))
        .await
        .json();
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["column_count"], 2);
    assert_eq!(updated["roadmap"][1]["title"], "Q2");

    let response = server
        .put(&format!("/api/roadmaps/{id}"))
        .json(&json!({ "format": "timeline", "column_count": 2, "roadmap": [] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let stored: Value = server.get(&format!("/api/roadmaps/{id}")).await.json();
    assert_eq!(stored["column_count"], 2);
    assert_eq!(stored["roadmap_header"], "2026");
}

#[tokio::test]
async fn users_only_see_their_own_documents() {
    let server = server();
    register(&server, "owner@example.com").await;
    register(&server, "other@example.com").await;

    let (name, value) = acting("owner@example.com");
    let created: Value = server
        .post("/api/prds")
        .add_header(name, value)
        .json(&prd("Insights"))
        .await
        .json();
    let id = created["id"].as_str().expect("id").to_string();

    let (name, value) = acting("other@example.com");
    server
        .get(&format!("/api/prds/{id}"))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let (name, value) = acting("other@example.com");
    let list: Value = server.get("/api/prds").add_header(name, value).await.json();
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn prd_export_as_markdown() {
    let mut server = server();
    sign_in(&mut server, "pm@example.com").await;
    let created: Value = server.post("/api/prds").json(&prd("Insights")).await.json();
    let id = created["id"].as_str().expect("id");

    let response = server
        .get(&format!("/api/prds/{id}/export"))
        .add_query_param("format", "md")
        .await;
    response.assert_status_ok();
    assert!(response.text().starts_with("# Insights"));

    server
        .get(&format!("/api/prds/{id}/export"))
        .add_query_param("format", "pdf")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn roadmap_rejects_mismatched_columns() {
    let mut server = server();
    sign_in(&mut server, "pm@example.com").await;

    let response = server
        .post("/api/roadmaps")
        .json(&json!({
            "roadmap_header": "2026",
            "format": "timeline",
            "column_count": 2,
            "roadmap": [{ "title": "Q1", "goals": [] }],
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["fields"], json!(["column_count"]));
}

#[tokio::test]
async fn growth_calculators_validate_input() {
    let server = server();

    let result: Value = server
        .post("/api/growth/referral")
        .json(&json!({ "initial_users": 100, "multiplier": 2.0, "cycles": 5 }))
        .await
        .json();
    assert_eq!(result["total_users"], 3200.0);

    server
        .post("/api/growth/referral")
        .json(&json!({ "initial_users": 100, "multiplier": 2.0, "cycles": 50 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn metric_samples_are_validated() {
    let server = server();

    let analysis: Value = server
        .post("/api/metrics/retention")
        .json(&json!([{ "cohort_date": "2026-01-01", "total_users": 200, "retained_users": 50 }]))
        .await
        .json();
    assert_eq!(analysis["points"][0]["rate"], 25.0);

    let response = server
        .post("/api/metrics/retention")
        .json(&json!([{ "cohort_date": "2026-01-01", "total_users": 10, "retained_users": 11 }]))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["fields"], json!(["retained_users"]));

    let response = server
        .post("/api/metrics/stickiness")
        .json(&json!([{ "analysis_date": "2026-01-01", "dau": -3, "mau": 100 }]))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["fields"], json!(["dau"]));
}

#[tokio::test]
async fn diagram_flows_are_traced() {
    let server = server();
    let trace: Value = server.get("/api/diagrams/auth/flows/login").await.json();
    assert_eq!(trace["edges"].as_array().map(Vec::len), Some(7));

    server
        .get("/api/diagrams/auth/flows/nope")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn simulation_runs_to_completion() {
    let server = server();

    let response = server
        .post("/api/simulations")
        .json(&json!({ "scenario": "weekly-report" }))
        .await;
    response.assert_status(StatusCode::ACCEPTED);
    let run: Value = response.json();
    assert_eq!(run["tasks"][0]["status"], "running");
    let id = run["id"].as_str().expect("id").to_string();

    tokio::time::sleep(Duration::from_millis(300)).await;

    let run: Value = server.get(&format!("/api/simulations/{id}")).await.json();
    let statuses: Vec<&str> = run["tasks"]
        .as_array()
        .expect("tasks")
        .iter()
        .filter_map(|t| t["status"].as_str())
        .collect();
    assert_eq!(statuses, vec!["done"; 4]);
    assert!(!run["finished_at"].is_null());
}

#[tokio::test]
async fn unknown_scenario_is_not_found() {
    let server = server();
    server
        .post("/api/simulations")
        .json(&json!({ "scenario": "payroll" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
