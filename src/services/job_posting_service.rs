use crate::dto::job_posting_dto::{JobPostingListQuery, JobPostingPayload, JobPostingSort};
use crate::error::{Error, Result};
use crate::models::job_posting::JobPosting;
use crate::services::pagination::{fetch_page, Filter, ListQuery, Page, PageRequest};
use rust_decimal::Decimal;
use sqlx::PgPool;

const JOB_POSTING_COLUMNS: &str = "j.id, j.title, j.description, j.salary, j.published_at, \
                                   j.company_id, c.legal_name AS company_name";
const JOB_POSTING_SOURCE: &str = "job_postings j LEFT JOIN companies c ON c.id = j.company_id";

/// Upper bound of a NUMERIC(10, 2) column.
const MAX_SALARY: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

#[derive(Clone)]
pub struct JobPostingService {
    pool: PgPool,
}

impl JobPostingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: JobPostingPayload) -> Result<JobPosting> {
        validate_salary(payload.salary)?;
        self.ensure_company_exists(payload.company_id).await?;

        let posting = sqlx::query_as::<_, JobPosting>(&format!(
            r#"
            WITH j AS (
                INSERT INTO job_postings (title, description, salary, company_id)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT {} FROM j LEFT JOIN companies c ON c.id = j.company_id
            "#,
            JOB_POSTING_COLUMNS
        ))
        .bind(payload.title.trim())
        .bind(&payload.description)
        .bind(payload.salary)
        .bind(payload.company_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            job_posting_id = posting.id,
            company_id = posting.company_id,
            "Job posting created"
        );
        Ok(posting)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<JobPosting> {
        sqlx::query_as::<_, JobPosting>(&format!(
            "SELECT {} FROM {} WHERE j.id = $1",
            JOB_POSTING_COLUMNS, JOB_POSTING_SOURCE
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Job posting {} not found", id)))
    }

    pub async fn update(&self, id: i64, payload: JobPostingPayload) -> Result<JobPosting> {
        validate_salary(payload.salary)?;
        self.get_by_id(id).await?;
        self.ensure_company_exists(payload.company_id).await?;

        let posting = sqlx::query_as::<_, JobPosting>(&format!(
            r#"
            WITH j AS (
                UPDATE job_postings
                SET title = $2, description = $3, salary = $4, company_id = $5
                WHERE id = $1
                RETURNING *
            )
            SELECT {} FROM j LEFT JOIN companies c ON c.id = j.company_id
            "#,
            JOB_POSTING_COLUMNS
        ))
        .bind(id)
        .bind(payload.title.trim())
        .bind(&payload.description)
        .bind(payload.salary)
        .bind(payload.company_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(job_posting_id = id, "Job posting updated");
        Ok(posting)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM job_postings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Job posting {} not found", id)));
        }

        tracing::info!(job_posting_id = id, "Job posting deleted");
        Ok(())
    }

    pub async fn list(&self, query: JobPostingListQuery) -> Result<Page<JobPosting>> {
        let request = PageRequest::new(query.page, query.page_size);

        let mut filters = Vec::new();
        if let Some(company_id) = query.company_id {
            filters.push(Filter::Equals("j.company_id", company_id));
        }
        if let Some(min_salary) = query.min_salary {
            filters.push(Filter::AtLeast("j.salary", min_salary));
        }
        if let Some(search) = query.search {
            filters.push(Filter::Contains(&["j.title", "j.description"], search));
        }

        let order_by = match JobPostingSort::parse(query.order_by.as_deref()) {
            JobPostingSort::PublishedDate => "j.published_at DESC, j.id DESC",
            JobPostingSort::Title => "j.title ASC, j.id ASC",
            JobPostingSort::Salary => "j.salary DESC, j.id ASC",
        };

        let list = ListQuery {
            from: JOB_POSTING_SOURCE,
            columns: JOB_POSTING_COLUMNS,
            filters,
            order_by,
        };
        let page = fetch_page(&self.pool, &list, request).await?;

        tracing::info!(
            page = page.page,
            page_size = page.page_size,
            total = page.total_count,
            company_id = ?query.company_id,
            min_salary = ?query.min_salary,
            "Listed job postings"
        );
        Ok(page)
    }

    async fn ensure_company_exists(&self, company_id: i64) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM companies WHERE id = $1)")
                .bind(company_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(Error::NotFound(format!("Company {} not found", company_id)));
        }
        Ok(())
    }
}

fn validate_salary(salary: Decimal) -> Result<()> {
    if salary.is_sign_negative() && !salary.is_zero() {
        return Err(Error::BadRequest("Salary must not be negative".to_string()));
    }
    if salary.scale() > 2 && salary.normalize().scale() > 2 {
        return Err(Error::BadRequest(
            "Salary must have at most two decimal places".to_string(),
        ));
    }
    if salary > MAX_SALARY {
        return Err(Error::BadRequest("Salary is too large".to_string()));
    }
    Ok(())
}
