use crate::dto::user_dto::{CreateUserPayload, UpdateUserPayload, UserListQuery, UserSort};
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::services::pagination::{fetch_page, Filter, ListQuery, Page, PageRequest};
use crate::utils::crypto::hash_password;
use sqlx::PgPool;

const USER_COLUMNS: &str = "id, name, email, password_hash, registered_at, tax_id";

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateUserPayload) -> Result<User> {
        self.ensure_unique(&payload.email, &payload.tax_id, None)
            .await?;

        let password_hash = hash_password(&payload.password)?;
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, tax_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(payload.name.trim())
        .bind(payload.email.trim())
        .bind(password_hash)
        .bind(payload.tax_id.trim())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn update(&self, id: i64, payload: UpdateUserPayload) -> Result<User> {
        self.get_by_id(id).await?;
        self.ensure_unique(&payload.email, &payload.tax_id, Some(id))
            .await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, tax_id = $4
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(payload.name.trim())
        .bind(payload.email.trim())
        .bind(payload.tax_id.trim())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = id, "User updated");
        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.get_by_id(id).await?;

        let has_certificates: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM certificates WHERE user_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        if has_certificates {
            return Err(Error::Conflict(
                "User has certificates and cannot be deleted".to_string(),
            ));
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    pub async fn list(&self, query: UserListQuery) -> Result<Page<User>> {
        let request = PageRequest::new(query.page, query.page_size);
        let mut filters = Vec::new();
        if let Some(search) = query.search {
            filters.push(Filter::Contains(&["name", "email"], search));
        }

        let list = ListQuery {
            from: "users",
            columns: USER_COLUMNS,
            filters,
            order_by: order_clause(UserSort::parse(query.order_by.as_deref())),
        };
        let page = fetch_page(&self.pool, &list, request).await?;

        tracing::info!(
            page = page.page,
            page_size = page.page_size,
            total = page.total_count,
            "Listed users"
        );
        Ok(page)
    }

    async fn ensure_unique(&self, email: &str, tax_id: &str, except: Option<i64>) -> Result<()> {
        let (email_taken, tax_id_taken): (bool, bool) = sqlx::query_as(
            r#"
            SELECT
                EXISTS (SELECT 1 FROM users WHERE email = $1 AND id IS DISTINCT FROM $3),
                EXISTS (SELECT 1 FROM users WHERE tax_id = $2 AND id IS DISTINCT FROM $3)
            "#,
        )
        .bind(email.trim())
        .bind(tax_id.trim())
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        if email_taken {
            tracing::warn!(email = email, "Email already registered");
            return Err(Error::Conflict("Email already registered".to_string()));
        }
        if tax_id_taken {
            return Err(Error::Conflict("Tax id already registered".to_string()));
        }
        Ok(())
    }
}

fn order_clause(sort: UserSort) -> &'static str {
    match sort {
        UserSort::Id => "id ASC",
        UserSort::Name => "name ASC, id ASC",
        UserSort::Registered => "registered_at DESC, id DESC",
    }
}
