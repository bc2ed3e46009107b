use crate::error::Result;
use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Normalized page coordinates. Out-of-range input is clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let page_size = match page_size {
            Some(size) if size > 0 => size.min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { page, page_size }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equals(&'static str, i64),
    AtLeast(&'static str, Decimal),
    /// Case-insensitive substring match against any of the columns.
    Contains(&'static [&'static str], String),
}

impl Filter {
    fn is_blank(&self) -> bool {
        match self {
            Filter::Contains(columns, term) => columns.is_empty() || term.trim().is_empty(),
            _ => false,
        }
    }
}

/// What to list: source relation (joins included), projected columns, filters and
/// ordering. `order_by` should end with a unique key so pages never overlap.
#[derive(Debug, Clone)]
pub struct ListQuery<'a> {
    pub from: &'a str,
    pub columns: &'a str,
    pub filters: Vec<Filter>,
    pub order_by: &'a str,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: i64) -> Self {
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_count,
            total_pages: total_pages(total_count, request.page_size),
        }
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}

pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if total_count <= 0 || page_size <= 0 {
        return 0;
    }
    (total_count + page_size - 1) / page_size
}

/// Counts the filtered set, then fetches the requested slice of it in order.
pub async fn fetch_page<T>(
    pool: &PgPool,
    query: &ListQuery<'_>,
    request: PageRequest,
) -> Result<Page<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
    count.push(query.from);
    push_filters(&mut count, &query.filters);
    let total_count: i64 = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    if request.offset() >= total_count {
        return Ok(Page::new(Vec::new(), request, total_count));
    }

    let mut select = select_builder(query);
    select.push(" LIMIT ").push_bind(request.page_size);
    select.push(" OFFSET ").push_bind(request.offset());
    let items = select.build_query_as::<T>().fetch_all(pool).await?;

    Ok(Page::new(items, request, total_count))
}

fn select_builder<'a>(query: &ListQuery<'_>) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
    builder.push(query.columns).push(" FROM ").push(query.from);
    push_filters(&mut builder, &query.filters);
    builder.push(" ORDER BY ").push(query.order_by);
    builder
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &[Filter]) {
    let mut first = true;
    for filter in filters.iter().filter(|f| !f.is_blank()) {
        builder.push(if first { " WHERE " } else { " AND " });
        first = false;

        match filter {
            Filter::Equals(column, value) => {
                builder.push(*column).push(" = ").push_bind(*value);
            }
            Filter::AtLeast(column, value) => {
                builder.push(*column).push(" >= ").push_bind(*value);
            }
            Filter::Contains(columns, term) => {
                let pattern = format!("%{}%", escape_like(term.trim()));
                builder.push("(");
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        builder.push(" OR ");
                    }
                    builder.push(*column).push(" ILIKE ").push_bind(pattern.clone());
                }
                builder.push(")");
            }
        }
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
