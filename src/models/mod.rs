use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database identifier for a user (BIGSERIAL primary key)
pub type UserId = i64;

/// Database identifier for a resource (BIGSERIAL primary key)
pub type ResourceId = i64;

/// A community-submitted content item (article, link, exercise)
///
/// The recommender only cares about its identity; the remaining fields
/// are carried along so a ranked recommendation can be returned to the
/// client without a second lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Resource {
    pub id: ResourceId,
    /// User who submitted the resource
    pub created_by: UserId,
    pub title: String,
    pub content: String,
    pub url: String,
    /// True if the resource points at external content
    pub external: bool,
    /// True if the resource was posted by an admin
    pub admin_post: bool,
}

/// One user's review of one resource
///
/// `rating` is an ordinal 1-5 star scale. Storage may or may not enforce
/// one review per (user, resource) pair; nothing here assumes uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub resource_id: ResourceId,
    pub user_id: UserId,
    pub content: String,
    /// Star rating, 1..=5
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

/// A resource paired with its recommendation score for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub resource: Resource,
    /// Aggregated peer score in [-1, 1]; higher means a stronger match
    pub probability: f64,
}

/// Response body for the recommendations endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub message: String,
    pub recommendations: Vec<Recommendation>,
}
