use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::{
        course_dto::{CourseListQuery, CoursePayload, CourseResponse},
        page_dto::PagedResponse,
    },
    error::Result,
    AppState,
};

pub type CoursePage = PagedResponse<CourseResponse>;

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("pageSize" = Option<i64>, Query, description = "Items per page, at most 100"),
        ("search" = Option<String>, Query, description = "Match on name or description"),
        ("orderBy" = Option<String>, Query, description = "id, name or hours")
    ),
    responses(
        (status = 200, description = "Courses retrieved", body = Json<CoursePage>)
    )
)]
#[axum::debug_handler]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> Result<impl IntoResponse> {
    let page = state.course_service.list(query).await?;
    Ok(Json(CoursePage::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CoursePayload,
    responses(
        (status = 201, description = "Course created", body = Json<CourseResponse>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_course(
    State(state): State<AppState>,
    Json(payload): Json<CoursePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let course = state.course_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(CourseResponse::from(course))))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = Json<CourseResponse>),
        (status = 404, description = "Course not found")
    )
)]
#[axum::debug_handler]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let course = state.course_service.get_by_id(id).await?;
    Ok(Json(CourseResponse::from(course)))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    request_body = CoursePayload,
    responses(
        (status = 200, description = "Course updated", body = Json<CourseResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Course not found")
    )
)]
#[axum::debug_handler]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CoursePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let course = state.course_service.update(id, payload).await?;
    Ok(Json(CourseResponse::from(course)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    params(
        ("id" = i64, Path, description = "Course ID")
    ),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Certificates were issued for the course")
    )
)]
#[axum::debug_handler]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.course_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
