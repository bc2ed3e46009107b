use crate::dto::course_dto::{CourseListQuery, CoursePayload, CourseSort};
use crate::error::{Error, Result};
use crate::models::course::Course;
use crate::services::pagination::{fetch_page, Filter, ListQuery, Page, PageRequest};
use sqlx::PgPool;

const COURSE_COLUMNS: &str = "id, name, description, hours";

#[derive(Clone)]
pub struct CourseService {
    pool: PgPool,
}

impl CourseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CoursePayload) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>(&format!(
            r#"
            INSERT INTO courses (name, description, hours)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            COURSE_COLUMNS
        ))
        .bind(payload.name.trim())
        .bind(&payload.description)
        .bind(payload.hours)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(course_id = course.id, hours = course.hours, "Course created");
        Ok(course)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Course> {
        sqlx::query_as::<_, Course>(&format!(
            "SELECT {} FROM courses WHERE id = $1",
            COURSE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Course {} not found", id)))
    }

    pub async fn update(&self, id: i64, payload: CoursePayload) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>(&format!(
            r#"
            UPDATE courses
            SET name = $2, description = $3, hours = $4
            WHERE id = $1
            RETURNING {}
            "#,
            COURSE_COLUMNS
        ))
        .bind(id)
        .bind(payload.name.trim())
        .bind(&payload.description)
        .bind(payload.hours)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Course {} not found", id)))?;

        tracing::info!(course_id = id, "Course updated");
        Ok(course)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.get_by_id(id).await?;

        let has_certificates: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM certificates WHERE course_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        if has_certificates {
            return Err(Error::Conflict(
                "Course has issued certificates and cannot be deleted".to_string(),
            ));
        }

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(course_id = id, "Course deleted");
        Ok(())
    }

    pub async fn list(&self, query: CourseListQuery) -> Result<Page<Course>> {
        let request = PageRequest::new(query.page, query.page_size);
        let mut filters = Vec::new();
        if let Some(search) = query.search {
            filters.push(Filter::Contains(&["name", "description"], search));
        }

        let order_by = match CourseSort::parse(query.order_by.as_deref()) {
            CourseSort::Id => "id ASC",
            CourseSort::Name => "name ASC, id ASC",
            CourseSort::Hours => "hours DESC, id ASC",
        };

        let list = ListQuery {
            from: "courses",
            columns: COURSE_COLUMNS,
            filters,
            order_by,
        };
        let page = fetch_page(&self.pool, &list, request).await?;

        tracing::info!(
            page = page.page,
            page_size = page.page_size,
            total = page.total_count,
            "Listed courses"
        );
        Ok(page)
    }
}
