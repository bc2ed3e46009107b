pub mod auth;
pub mod certificates;
pub mod companies;
pub mod courses;
pub mod health;
pub mod job_postings;
pub mod recommendations;
pub mod users;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{middleware::auth::require_bearer_auth, AppState};

pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login));

    let protected = Router::new()
        .route(
            "/api/v1/users",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/api/v1/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/v1/users/:id/course-recommendations",
            get(recommendations::recommend_courses),
        )
        .route(
            "/api/v1/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/api/v1/companies/:id",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route(
            "/api/v1/job-postings",
            get(job_postings::list_job_postings).post(job_postings::create_job_posting),
        )
        .route(
            "/api/v1/job-postings/:id",
            get(job_postings::get_job_posting)
                .put(job_postings::update_job_posting)
                .delete(job_postings::delete_job_posting),
        )
        .route(
            "/api/v1/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/api/v1/courses/:id",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        .route(
            "/api/v1/certificates",
            get(certificates::list_certificates).post(certificates::create_certificate),
        )
        .route(
            "/api/v1/certificates/:id",
            get(certificates::get_certificate)
                .put(certificates::update_certificate)
                .delete(certificates::delete_certificate),
        )
        .route_layer(from_fn_with_state(state.clone(), require_bearer_auth));

    public
        .merge(protected)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
