use chrono::Utc;
use sqlx::PgPool;

use crate::dto::certificate_dto::{
    CertificateListQuery, CertificateSort, CreateCertificatePayload, UpdateCertificatePayload,
};
use crate::error::{Error, Result, UNIQUE_VIOLATION};
use crate::models::certificate::Certificate;
use crate::services::pagination::{fetch_page, Filter, ListQuery, Page, PageRequest};
use crate::utils::certificate_id::{
    generate_certificate_id, generate_validation_code, is_valid_certificate_id,
};

const CERTIFICATE_COLUMNS: &str = "ct.id, ct.issued_at, ct.description, ct.validation_code, \
                                   ct.user_id, ct.course_id, u.name AS user_name, \
                                   co.name AS course_name";
const CERTIFICATE_SOURCE: &str = "certificates ct \
                                  LEFT JOIN users u ON u.id = ct.user_id \
                                  LEFT JOIN courses co ON co.id = ct.course_id";

const MAX_ID_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct CertificateService {
    pool: PgPool,
}

impl CertificateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateCertificatePayload) -> Result<Certificate> {
        self.ensure_exists("users", "User", payload.user_id).await?;
        self.ensure_exists("courses", "Course", payload.course_id)
            .await?;

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = generate_certificate_id(Utc::now(), &mut rand::thread_rng());

            if let Some(certificate) = self.insert(&id, &payload).await? {
                tracing::info!(
                    certificate_id = %certificate.id,
                    user_id = certificate.user_id,
                    course_id = certificate.course_id,
                    "Certificate issued"
                );
                return Ok(certificate);
            }
            tracing::warn!(certificate_id = %id, attempt, "Certificate id collision, retrying");
        }

        Err(Error::Conflict(
            "Could not allocate a unique certificate id".to_string(),
        ))
    }

    /// `Ok(None)` when the id is already taken; every other failure is returned as is.
    async fn insert(
        &self,
        id: &str,
        payload: &CreateCertificatePayload,
    ) -> Result<Option<Certificate>> {
        let inserted = sqlx::query_as::<_, Certificate>(&format!(
            r#"
            WITH ct AS (
                INSERT INTO certificates (id, description, validation_code, user_id, course_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT {} FROM ct
            LEFT JOIN users u ON u.id = ct.user_id
            LEFT JOIN courses co ON co.id = ct.course_id
            "#,
            CERTIFICATE_COLUMNS
        ))
        .bind(id)
        .bind(payload.description.trim())
        .bind(generate_validation_code())
        .bind(payload.user_id)
        .bind(payload.course_id)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(certificate) => Ok(Some(certificate)),
            Err(sqlx::Error::Database(db_err))
                if is_id_collision(db_err.code().as_deref(), db_err.constraint()) =>
            {
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Certificate> {
        ensure_well_formed(id)?;
        sqlx::query_as::<_, Certificate>(&format!(
            "SELECT {} FROM {} WHERE ct.id = $1",
            CERTIFICATE_COLUMNS, CERTIFICATE_SOURCE
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Certificate {} not found", id)))
    }

    /// Only the description is mutable; the rest of a certificate is fixed at issue time.
    pub async fn update(&self, id: &str, payload: UpdateCertificatePayload) -> Result<Certificate> {
        ensure_well_formed(id)?;
        let certificate = sqlx::query_as::<_, Certificate>(&format!(
            r#"
            WITH ct AS (
                UPDATE certificates SET description = $2 WHERE id = $1 RETURNING *
            )
            SELECT {} FROM ct
            LEFT JOIN users u ON u.id = ct.user_id
            LEFT JOIN courses co ON co.id = ct.course_id
            "#,
            CERTIFICATE_COLUMNS
        ))
        .bind(id)
        .bind(payload.description.trim())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Certificate {} not found", id)))?;

        tracing::info!(certificate_id = %id, "Certificate updated");
        Ok(certificate)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        ensure_well_formed(id)?;
        let result = sqlx::query("DELETE FROM certificates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Certificate {} not found", id)));
        }

        tracing::info!(certificate_id = %id, "Certificate deleted");
        Ok(())
    }

    pub async fn list(&self, query: CertificateListQuery) -> Result<Page<Certificate>> {
        let request = PageRequest::new(query.page, query.page_size);
        let mut filters = Vec::new();
        if let Some(user_id) = query.user_id {
            filters.push(Filter::Equals("ct.user_id", user_id));
        }
        if let Some(course_id) = query.course_id {
            filters.push(Filter::Equals("ct.course_id", course_id));
        }

        let order_by = match CertificateSort::parse(query.order_by.as_deref()) {
            CertificateSort::Issued => "ct.issued_at DESC, ct.id DESC",
            CertificateSort::Id => "ct.id ASC",
        };

        let list = ListQuery {
            from: CERTIFICATE_SOURCE,
            columns: CERTIFICATE_COLUMNS,
            filters,
            order_by,
        };
        let page = fetch_page(&self.pool, &list, request).await?;

        tracing::info!(
            page = page.page,
            page_size = page.page_size,
            total = page.total_count,
            user_id = ?query.user_id,
            course_id = ?query.course_id,
            "Listed certificates"
        );
        Ok(page)
    }

    async fn ensure_exists(&self, table: &'static str, label: &str, id: i64) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar(&format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", table))
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(Error::NotFound(format!("{} {} not found", label, id)));
        }
        Ok(())
    }
}

fn is_id_collision(code: Option<&str>, constraint: Option<&str>) -> bool {
    code == Some(UNIQUE_VIOLATION) && constraint == Some("certificates_pkey")
}

/// Ids outside the 8-10 digit format can never match a stored certificate.
fn ensure_well_formed(id: &str) -> Result<()> {
    if is_valid_certificate_id(id) {
        Ok(())
    } else {
        Err(Error::NotFound(format!("Certificate {} not found", id)))
    }
}
