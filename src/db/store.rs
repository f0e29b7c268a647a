use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{Resource, ResourceId, Review, UserId},
};

/// Read-side storage collaborator for the recommender
///
/// The recommender never writes; it issues a sequence of point reads
/// against the review and resource tables on every request. Injected as
/// a trait object so the pipeline can run against a test double.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReviewStore: Send + Sync {
    /// Every review authored by one user
    async fn find_reviews_by_user(&self, user_id: UserId) -> AppResult<Vec<Review>>;

    /// Every review of one resource, regardless of rating
    async fn find_reviews_by_resource(&self, resource_id: ResourceId) -> AppResult<Vec<Review>>;

    /// Reviews of a resource rated at or above `min_rating`
    async fn find_reviews_by_resource_min_rating(
        &self,
        resource_id: ResourceId,
        min_rating: i16,
    ) -> AppResult<Vec<Review>>;

    /// Reviews of a resource rated strictly below `max_rating`
    async fn find_reviews_by_resource_below_rating(
        &self,
        resource_id: ResourceId,
        max_rating: i16,
    ) -> AppResult<Vec<Review>>;

    /// Ids of every resource currently in the catalog
    async fn list_resource_ids(&self) -> AppResult<Vec<ResourceId>>;

    /// Full resource record by id
    async fn get_resource(&self, resource_id: ResourceId) -> AppResult<Resource>;
}

/// PostgreSQL-backed implementation of [`ReviewStore`]
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ReviewStore for PgReviewStore {
    async fn find_reviews_by_user(&self, user_id: UserId) -> AppResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, resource_id, user_id, content, rating, created_at \
             FROM reviews WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn find_reviews_by_resource(&self, resource_id: ResourceId) -> AppResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, resource_id, user_id, content, rating, created_at \
             FROM reviews WHERE resource_id = $1",
        )
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn find_reviews_by_resource_min_rating(
        &self,
        resource_id: ResourceId,
        min_rating: i16,
    ) -> AppResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, resource_id, user_id, content, rating, created_at \
             FROM reviews WHERE resource_id = $1 AND rating >= $2",
        )
        .bind(resource_id)
        .bind(min_rating)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn find_reviews_by_resource_below_rating(
        &self,
        resource_id: ResourceId,
        max_rating: i16,
    ) -> AppResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, resource_id, user_id, content, rating, created_at \
             FROM reviews WHERE resource_id = $1 AND rating < $2",
        )
        .bind(resource_id)
        .bind(max_rating)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn list_resource_ids(&self) -> AppResult<Vec<ResourceId>> {
        let ids = sqlx::query_scalar::<_, ResourceId>("SELECT id FROM resources")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    async fn get_resource(&self, resource_id: ResourceId) -> AppResult<Resource> {
        let resource = sqlx::query_as::<_, Resource>(
            "SELECT id, created_by, title, content, url, external, admin_post \
             FROM resources WHERE id = $1",
        )
        .bind(resource_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(resource)
    }
}
