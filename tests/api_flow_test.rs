//! End-to-end flows against a real database. Run with
//! `DATABASE_URL=... cargo test -- --ignored`.

use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use ecolesson_backend::{
    config::Config,
    database::pool::{create_pool, run_migrations},
    routes::create_router,
    AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

async fn app() -> Router {
    dotenvy::dotenv().ok();
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    if env::var("JWT_SECRET").map(|s| s.len() < 32).unwrap_or(true) {
        env::set_var("JWT_SECRET", "integration-test-secret-with-32-bytes");
    }

    let config = Config::from_env().expect("config");
    let pool = create_pool(&config).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");
    create_router(AppState::new(pool, &config))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, json)
}

fn unique(len: usize) -> String {
    let mut s = Uuid::new_v4().simple().to_string();
    s.truncate(len);
    s
}

async fn register_and_login(app: &Router) -> (i64, String) {
    let email = format!("user_{}@example.com", unique(12));
    let (status, user) = call(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "name": "Flow User",
            "email": email,
            "password": "senha123",
            "taxId": unique(14)
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", user);
    assert!(user.get("passwordHash").is_none());

    let (status, auth) = call(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "senha123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", auth);

    let id = user["id"].as_i64().expect("user id");
    let token = auth["token"].as_str().expect("token").to_string();
    (id, token)
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn wrong_password_gets_generic_unauthorized() {
    let app = app().await;
    let email = format!("pw_{}@example.com", unique(12));
    let (status, _) = call(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({ "name": "Pw", "email": email, "password": "senha123", "taxId": unique(14) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (wrong, wrong_body) = call(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "nope-nope" })),
    )
    .await;
    let (unknown, unknown_body) = call(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": "senha123" })),
    )
    .await;

    assert_eq!(wrong, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_email_is_a_conflict() {
    let app = app().await;
    let email = format!("dup_{}@example.com", unique(12));
    let payload = |tax_id: String| {
        json!({ "name": "Dup", "email": email, "password": "senha123", "taxId": tax_id })
    };

    let (first, _) = call(&app, "POST", "/api/v1/auth/register", None, Some(payload(unique(14)))).await;
    let (second, body) =
        call(&app, "POST", "/api/v1/auth/register", None, Some(payload(unique(14)))).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn job_posting_crud_and_salary_filter() {
    let app = app().await;
    let (_, token) = register_and_login(&app).await;
    let token = Some(token.as_str());

    let (status, company) = call(
        &app,
        "POST",
        "/api/v1/companies",
        token,
        Some(json!({
            "legalName": "Green Energy Ltd",
            "registrationNumber": unique(18),
            "email": "jobs@green.example"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", company);
    let company_id = company["id"].as_i64().expect("company id");

    let mut created = Vec::new();
    for (title, salary) in [("Junior", "3000.00"), ("Mid", "5000.00"), ("Senior", "8000.50")] {
        let (status, posting) = call(
            &app,
            "POST",
            "/api/v1/job-postings",
            token,
            Some(json!({
                "title": title,
                "description": "Solar panel installation",
                "salary": salary,
                "companyId": company_id
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", posting);
        assert_eq!(posting["companyName"], "Green Energy Ltd");
        created.push(posting);
    }

    let senior_id = created[2]["id"].as_i64().expect("posting id");
    let (status, fetched) = call(&app, "GET", &format!("/api/v1/job-postings/{}", senior_id), token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Senior");
    assert_eq!(fetched["description"], "Solar panel installation");
    assert_eq!(fetched["salary"], created[2]["salary"]);
    assert_eq!(fetched["companyId"], company_id);

    let (status, page) = call(
        &app,
        "GET",
        &format!("/api/v1/job-postings?companyId={}&minSalary=5000&orderBy=salary", company_id),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalCount"], 2);
    let titles: Vec<_> = page["data"]
        .as_array()
        .expect("data")
        .iter()
        .map(|p| p["title"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(titles, vec!["Senior", "Mid"]);

    let (status, past_end) = call(
        &app,
        "GET",
        &format!("/api/v1/job-postings?empresaId={}&page=9&pageSize=2", company_id),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(past_end["data"], json!([]));
    assert_eq!(past_end["totalCount"], 3);
    assert_eq!(past_end["totalPages"], 2);
    assert_eq!(past_end["hasNextPage"], false);

    let (status, _) = call(&app, "DELETE", &format!("/api/v1/companies/{}", company_id), token, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    for posting in &created {
        let id = posting["id"].as_i64().expect("posting id");
        let (status, _) = call(&app, "DELETE", &format!("/api/v1/job-postings/{}", id), token, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
    let (status, _) = call(&app, "DELETE", &format!("/api/v1/companies/{}", company_id), token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn peer_course_is_recommended_first() {
    let app = app().await;
    let (user_a, token) = register_and_login(&app).await;
    let (user_b, _) = register_and_login(&app).await;
    let token = Some(token.as_str());

    let mut courses = Vec::new();
    for name in ["Recycling 101", "Composting at scale"] {
        let (status, course) = call(
            &app,
            "POST",
            "/api/v1/courses",
            token,
            Some(json!({ "name": name, "description": "", "hours": 12 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", course);
        courses.push(course["id"].as_i64().expect("course id"));
    }

    for (user_id, course_id) in [(user_a, courses[0]), (user_b, courses[0]), (user_b, courses[1])] {
        let (status, certificate) = call(
            &app,
            "POST",
            "/api/v1/certificates",
            token,
            Some(json!({ "userId": user_id, "courseId": course_id, "description": "Completed" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", certificate);
        let id = certificate["id"].as_str().expect("certificate id");
        assert!((8..=10).contains(&id.len()));
        assert!(id.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(certificate["validationCode"].as_str().map(str::len), Some(20));
    }

    let (status, recommended) = call(
        &app,
        "GET",
        &format!("/api/v1/users/{}/course-recommendations?topN=5", user_a),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = recommended
        .as_array()
        .expect("list")
        .iter()
        .filter_map(|c| c["id"].as_i64())
        .collect();
    assert!(ids.len() <= 5);
    assert_eq!(ids.first(), Some(&courses[1]));
    assert!(!ids.contains(&courses[0]));

    let (status, _) = call(
        &app,
        "GET",
        "/api/v1/users/999999999/course-recommendations",
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "DELETE", &format!("/api/v1/users/{}", user_b), token, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn user_update_is_visible_on_read() {
    let app = app().await;
    let (user_id, token) = register_and_login(&app).await;
    let token = Some(token.as_str());
    let uri = format!("/api/v1/users/{}", user_id);

    let (status, before) = call(&app, "GET", &uri, token, None).await;
    assert_eq!(status, StatusCode::OK, "{}", before);
    assert_eq!(before["id"], user_id);
    assert_eq!(before["name"], "Flow User");
    assert!(before.get("passwordHash").is_none());

    let email = format!("renamed_{}@example.com", unique(12));
    let tax_id = unique(14);
    let (status, updated) = call(
        &app,
        "PUT",
        &uri,
        token,
        Some(json!({ "name": "  Renamed User ", "email": email, "taxId": tax_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);

    let (status, after) = call(&app, "GET", &uri, token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["name"], "Renamed User");
    assert_eq!(after["email"], email);
    assert_eq!(after["taxId"], tax_id);
    assert_eq!(after["registeredAt"], before["registeredAt"]);
    assert_eq!(after, updated);

    let (status, _) = call(
        &app,
        "PUT",
        &uri,
        token,
        Some(json!({ "name": "   ", "email": email, "taxId": tax_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, "DELETE", &uri, token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, "GET", &uri, token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn company_update_is_visible_on_read() {
    let app = app().await;
    let (_, token) = register_and_login(&app).await;
    let token = Some(token.as_str());

    let registration_number = unique(18);
    let (status, created) = call(
        &app,
        "POST",
        "/api/v1/companies",
        token,
        Some(json!({
            "legalName": "Wind Works",
            "registrationNumber": registration_number,
            "email": "hello@wind.example"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    let uri = format!("/api/v1/companies/{}", created["id"].as_i64().expect("company id"));

    let (status, fetched) = call(&app, "GET", &uri, token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["legalName"], "Wind Works");
    assert_eq!(fetched["registrationNumber"], registration_number);
    assert_eq!(fetched["email"], "hello@wind.example");
    assert_eq!(fetched, created);

    let new_number = unique(18);
    let (status, updated) = call(
        &app,
        "PUT",
        &uri,
        token,
        Some(json!({ "legalName": "Wind Works S.A.", "registrationNumber": new_number })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);

    let (status, after) = call(&app, "GET", &uri, token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["legalName"], "Wind Works S.A.");
    assert_eq!(after["registrationNumber"], new_number);
    assert_eq!(after["email"], JsonValue::Null);
    assert_eq!(after, updated);

    let (status, _) = call(&app, "DELETE", &uri, token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn course_update_is_visible_on_read() {
    let app = app().await;
    let (_, token) = register_and_login(&app).await;
    let token = Some(token.as_str());

    let (status, created) = call(
        &app,
        "POST",
        "/api/v1/courses",
        token,
        Some(json!({ "name": "Water reuse", "description": "Greywater systems", "hours": 20 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    let uri = format!("/api/v1/courses/{}", created["id"].as_i64().expect("course id"));

    let (status, fetched) = call(&app, "GET", &uri, token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Water reuse");
    assert_eq!(fetched["description"], "Greywater systems");
    assert_eq!(fetched["hours"], 20);
    assert_eq!(fetched, created);

    let (status, updated) = call(
        &app,
        "PUT",
        &uri,
        token,
        Some(json!({ "name": "Water reuse II", "description": "Rainwater capture", "hours": 32 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);

    let (status, after) = call(&app, "GET", &uri, token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["name"], "Water reuse II");
    assert_eq!(after["description"], "Rainwater capture");
    assert_eq!(after["hours"], 32);
    assert_eq!(after, updated);

    let (status, _) = call(&app, "DELETE", &uri, token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn certificate_update_is_visible_on_read() {
    let app = app().await;
    let (user_id, token) = register_and_login(&app).await;
    let token = Some(token.as_str());

    let (status, course) = call(
        &app,
        "POST",
        "/api/v1/courses",
        token,
        Some(json!({ "name": "Urban gardens", "description": "", "hours": 8 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", course);
    let course_id = course["id"].as_i64().expect("course id");

    let (status, created) = call(
        &app,
        "POST",
        "/api/v1/certificates",
        token,
        Some(json!({ "userId": user_id, "courseId": course_id, "description": "Completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    let uri = format!(
        "/api/v1/certificates/{}",
        created["id"].as_str().expect("certificate id")
    );

    let (status, fetched) = call(&app, "GET", &uri, token, None).await;
    assert_eq!(status, StatusCode::OK, "{}", fetched);
    assert_eq!(fetched["description"], "Completed");
    assert_eq!(fetched["userId"], user_id);
    assert_eq!(fetched["courseId"], course_id);
    assert_eq!(fetched["userName"], "Flow User");
    assert_eq!(fetched["courseName"], "Urban gardens");
    assert_eq!(fetched["validationCode"], created["validationCode"]);
    assert_eq!(fetched["issuedAt"], created["issuedAt"]);

    let (status, updated) = call(
        &app,
        "PUT",
        &uri,
        token,
        Some(json!({ "description": "Completed with honours" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);

    let (status, after) = call(&app, "GET", &uri, token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["description"], "Completed with honours");
    assert_eq!(after["validationCode"], created["validationCode"]);
    assert_eq!(after["userId"], user_id);
    assert_eq!(after["courseId"], course_id);
    assert_eq!(after, updated);

    let (status, _) = call(&app, "DELETE", &uri, token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, "GET", &uri, token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn malformed_certificate_id_is_not_found() {
    let app = app().await;
    let (_, token) = register_and_login(&app).await;

    let (status, body) = call(&app, "GET", "/api/v1/certificates/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap_or_default().contains("abc"));
}
