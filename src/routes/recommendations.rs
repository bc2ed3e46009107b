use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::course_dto::{CourseResponse, RecommendationQuery},
    error::Result,
    AppState,
};

pub const DEFAULT_TOP_N: usize = 5;
pub const MAX_TOP_N: usize = 20;

/// Absent or out-of-range counts fall back to the default rather than failing.
pub fn clamp_top_n(requested: Option<i64>) -> usize {
    match requested {
        Some(n) if (1..=MAX_TOP_N as i64).contains(&n) => n as usize,
        _ => DEFAULT_TOP_N,
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/course-recommendations",
    params(
        ("id" = i64, Path, description = "User ID"),
        ("topN" = Option<i64>, Query, description = "How many courses, 1 to 20 (default 5)")
    ),
    responses(
        (status = 200, description = "Recommended courses", body = Json<Vec<CourseResponse>>),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn recommend_courses(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<RecommendationQuery>,
) -> Result<impl IntoResponse> {
    state.user_service.get_by_id(id).await?;

    let top_n = clamp_top_n(query.top_n);
    let courses = state.recommendation_service.recommend(id, top_n).await?;
    let body: Vec<CourseResponse> = courses.into_iter().map(CourseResponse::from).collect();
    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_n_is_clamped_to_default() {
        assert_eq!(clamp_top_n(None), 5);
        assert_eq!(clamp_top_n(Some(0)), 5);
        assert_eq!(clamp_top_n(Some(-3)), 5);
        assert_eq!(clamp_top_n(Some(21)), 5);
        assert_eq!(clamp_top_n(Some(1)), 1);
        assert_eq!(clamp_top_n(Some(20)), 20);
    }
}
