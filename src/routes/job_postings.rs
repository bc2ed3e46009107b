use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::{
        job_posting_dto::{JobPostingListQuery, JobPostingPayload, JobPostingResponse},
        page_dto::PagedResponse,
    },
    error::Result,
    AppState,
};

pub type JobPostingPage = PagedResponse<JobPostingResponse>;

#[utoipa::path(
    get,
    path = "/api/v1/job-postings",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("pageSize" = Option<i64>, Query, description = "Items per page, at most 100"),
        ("companyId" = Option<i64>, Query, description = "Only postings of this company"),
        ("minSalary" = Option<String>, Query, description = "Only postings paying at least this much"),
        ("search" = Option<String>, Query, description = "Match on title or description"),
        ("orderBy" = Option<String>, Query, description = "date, name or salary")
    ),
    responses(
        (status = 200, description = "Job postings retrieved", body = Json<JobPostingPage>)
    )
)]
#[axum::debug_handler]
pub async fn list_job_postings(
    State(state): State<AppState>,
    Query(query): Query<JobPostingListQuery>,
) -> Result<impl IntoResponse> {
    let page = state.job_posting_service.list(query).await?;
    Ok(Json(JobPostingPage::from_page(page)))
}

#[utoipa::path(
    post,
    path = "/api/v1/job-postings",
    request_body = JobPostingPayload,
    responses(
        (status = 201, description = "Job posting created", body = Json<JobPostingResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Company not found")
    )
)]
#[axum::debug_handler]
pub async fn create_job_posting(
    State(state): State<AppState>,
    Json(payload): Json<JobPostingPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let posting = state.job_posting_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(JobPostingResponse::from(posting))))
}

#[utoipa::path(
    get,
    path = "/api/v1/job-postings/{id}",
    params(
        ("id" = i64, Path, description = "Job posting ID")
    ),
    responses(
        (status = 200, description = "Job posting found", body = Json<JobPostingResponse>),
        (status = 404, description = "Job posting not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job_posting(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let posting = state.job_posting_service.get_by_id(id).await?;
    Ok(Json(JobPostingResponse::from(posting)))
}

#[utoipa::path(
    put,
    path = "/api/v1/job-postings/{id}",
    params(
        ("id" = i64, Path, description = "Job posting ID")
    ),
    request_body = JobPostingPayload,
    responses(
        (status = 200, description = "Job posting updated", body = Json<JobPostingResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Job posting or company not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job_posting(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<JobPostingPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let posting = state.job_posting_service.update(id, payload).await?;
    Ok(Json(JobPostingResponse::from(posting)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/job-postings/{id}",
    params(
        ("id" = i64, Path, description = "Job posting ID")
    ),
    responses(
        (status = 204, description = "Job posting deleted"),
        (status = 404, description = "Job posting not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job_posting(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.job_posting_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
