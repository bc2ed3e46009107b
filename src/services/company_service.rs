use crate::dto::company_dto::{CompanyListQuery, CompanyPayload, CompanySort};
use crate::error::{Error, Result};
use crate::models::company::Company;
use crate::services::pagination::{fetch_page, Filter, ListQuery, Page, PageRequest};
use sqlx::PgPool;

const COMPANY_COLUMNS: &str = "id, legal_name, registration_number, email";

#[derive(Clone)]
pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CompanyPayload) -> Result<Company> {
        self.ensure_unique(&payload.registration_number, None)
            .await?;

        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            INSERT INTO companies (legal_name, registration_number, email)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(payload.legal_name.trim())
        .bind(payload.registration_number.trim())
        .bind(payload.email.as_deref().map(str::trim))
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(company_id = company.id, "Company created");
        Ok(company)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Company> {
        sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Company {} not found", id)))
    }

    pub async fn update(&self, id: i64, payload: CompanyPayload) -> Result<Company> {
        self.get_by_id(id).await?;
        self.ensure_unique(&payload.registration_number, Some(id))
            .await?;

        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies
            SET legal_name = $2, registration_number = $3, email = $4
            WHERE id = $1
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(id)
        .bind(payload.legal_name.trim())
        .bind(payload.registration_number.trim())
        .bind(payload.email.as_deref().map(str::trim))
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(company_id = id, "Company updated");
        Ok(company)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.get_by_id(id).await?;

        let has_postings: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM job_postings WHERE company_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        if has_postings {
            return Err(Error::Conflict(
                "Company has job postings and cannot be deleted".to_string(),
            ));
        }

        sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(company_id = id, "Company deleted");
        Ok(())
    }

    pub async fn list(&self, query: CompanyListQuery) -> Result<Page<Company>> {
        let request = PageRequest::new(query.page, query.page_size);
        let mut filters = Vec::new();
        if let Some(search) = query.search {
            filters.push(Filter::Contains(&["legal_name", "email"], search));
        }

        let order_by = match CompanySort::parse(query.order_by.as_deref()) {
            CompanySort::Id => "id ASC",
            CompanySort::Name => "legal_name ASC, id ASC",
        };

        let list = ListQuery {
            from: "companies",
            columns: COMPANY_COLUMNS,
            filters,
            order_by,
        };
        let page = fetch_page(&self.pool, &list, request).await?;

        tracing::info!(
            page = page.page,
            page_size = page.page_size,
            total = page.total_count,
            "Listed companies"
        );
        Ok(page)
    }

    async fn ensure_unique(&self, registration_number: &str, except: Option<i64>) -> Result<()> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM companies
                WHERE registration_number = $1 AND id IS DISTINCT FROM $2
            )
            "#,
        )
        .bind(registration_number.trim())
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        if taken {
            return Err(Error::Conflict(
                "Registration number already registered".to_string(),
            ));
        }
        Ok(())
    }
}
