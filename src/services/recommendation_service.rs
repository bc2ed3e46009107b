use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::course::{Course, RankedCourse};

/// Read access to completion history. Everything the ranking needs comes through here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Every course with the number of certificates issued for it.
    async fn course_popularity(&self) -> Result<Vec<RankedCourse>>;

    async fn completed_course_ids(&self, user_id: i64) -> Result<Vec<i64>>;

    /// `(user_id, course_id)` for every certificate held by a user who shares at
    /// least one completed course with `user_id`.
    async fn peer_holdings(&self, user_id: i64) -> Result<Vec<(i64, i64)>>;

    async fn catalog_head(&self, limit: i64) -> Result<Vec<Course>>;
}

#[derive(Clone)]
pub struct PgRecommendationStore {
    pool: PgPool,
}

impl PgRecommendationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecommendationStore for PgRecommendationStore {
    async fn course_popularity(&self) -> Result<Vec<RankedCourse>> {
        let rows = sqlx::query_as::<_, RankedCourse>(
            r#"
            SELECT c.id, c.name, c.description, c.hours,
                   COUNT(ct.id) AS certificate_count
            FROM courses c
            LEFT JOIN certificates ct ON ct.course_id = c.id
            GROUP BY c.id
            ORDER BY certificate_count DESC, c.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn completed_course_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT DISTINCT course_id FROM certificates WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn peer_holdings(&self, user_id: i64) -> Result<Vec<(i64, i64)>> {
        let rows = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT held.user_id, held.course_id
            FROM certificates held
            WHERE held.user_id <> $1
              AND held.user_id IN (
                  SELECT peer.user_id
                  FROM certificates peer
                  JOIN certificates own ON own.course_id = peer.course_id
                  WHERE own.user_id = $1 AND peer.user_id <> $1
              )
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn catalog_head(&self, limit: i64) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT id, name, description, hours FROM courses ORDER BY id ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }
}

/// Co-occurrence recommender with a popularity backfill.
#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn RecommendationStore>,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn RecommendationStore>) -> Self {
        Self { store }
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self::new(Arc::new(PgRecommendationStore::new(pool)))
    }

    /// Up to `top_n` courses for `user_id`. Store failures degrade to the first
    /// courses of the catalog; only a failure of that fallback reaches the caller.
    pub async fn recommend(&self, user_id: i64, top_n: usize) -> Result<Vec<Course>> {
        if top_n == 0 {
            return Ok(Vec::new());
        }

        match self.ranked(user_id, top_n).await {
            Ok(courses) => {
                tracing::info!(user_id, top_n, returned = courses.len(), "Recommendations built");
                Ok(courses)
            }
            Err(err) => {
                tracing::error!(
                    user_id,
                    error = %err,
                    "Recommendation inputs unavailable, serving catalog head"
                );
                let limit = i64::try_from(top_n).unwrap_or(i64::MAX);
                self.store.catalog_head(limit).await
            }
        }
    }

    async fn ranked(&self, user_id: i64, top_n: usize) -> Result<Vec<Course>> {
        let popularity = self.store.course_popularity().await?;
        if popularity.iter().all(|c| c.certificate_count == 0) {
            return Ok(rank_courses(user_id, &[], &[], &popularity, top_n));
        }

        let completed = self.store.completed_course_ids(user_id).await?;
        let peer_holdings = if completed.is_empty() {
            Vec::new()
        } else {
            self.store.peer_holdings(user_id).await?
        };

        Ok(rank_courses(
            user_id,
            &completed,
            &peer_holdings,
            &popularity,
            top_n,
        ))
    }
}

/// Ranks courses for one user.
///
/// With no certificates anywhere the result is the catalog by popularity. Otherwise
/// courses held by peers (users sharing a completed course) are ranked by how many
/// distinct peers hold them, and the remainder is filled from the most popular
/// courses. Courses the user already completed never appear.
pub fn rank_courses(
    user_id: i64,
    completed: &[i64],
    peer_holdings: &[(i64, i64)],
    popularity: &[RankedCourse],
    top_n: usize,
) -> Vec<Course> {
    let mut by_popularity: Vec<&RankedCourse> = popularity.iter().collect();
    by_popularity.sort_by(|a, b| {
        b.certificate_count
            .cmp(&a.certificate_count)
            .then(a.id.cmp(&b.id))
    });

    let total: i64 = popularity.iter().map(|c| c.certificate_count).sum();
    if total == 0 {
        return by_popularity
            .into_iter()
            .take(top_n)
            .cloned()
            .map(Course::from)
            .collect();
    }

    let completed: HashSet<i64> = completed.iter().copied().collect();
    let catalog: HashMap<i64, &RankedCourse> = popularity.iter().map(|c| (c.id, c)).collect();

    let mut holders: HashMap<i64, HashSet<i64>> = HashMap::new();
    for &(peer, course_id) in peer_holdings {
        if peer == user_id || completed.contains(&course_id) {
            continue;
        }
        holders.entry(course_id).or_default().insert(peer);
    }

    let mut candidates: Vec<(i64, usize)> = holders
        .into_iter()
        .filter(|(course_id, _)| catalog.contains_key(course_id))
        .map(|(course_id, peers)| (course_id, peers.len()))
        .collect();
    candidates.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    candidates.truncate(top_n);

    let mut picked: Vec<&RankedCourse> = candidates
        .iter()
        .filter_map(|(course_id, _)| catalog.get(course_id).copied())
        .collect();

    if picked.len() < top_n {
        let taken: HashSet<i64> = picked.iter().map(|c| c.id).collect();
        let backfill = by_popularity
            .into_iter()
            .filter(|c| !completed.contains(&c.id) && !taken.contains(&c.id))
            .take(top_n - picked.len());
        picked.extend(backfill);
    }

    picked.into_iter().cloned().map(Course::from).collect()
}
