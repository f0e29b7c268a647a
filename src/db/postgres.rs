use sqlx::{postgres::PgPoolOptions, PgPool};

/// Connection cap for the review-store pool
///
/// The recommender issues many short point reads per request but holds
/// no connection across them, so a small shared pool suffices.
const MAX_CONNECTIONS: u32 = 5;

/// Creates the PostgreSQL pool backing [`PgReviewStore`](super::PgReviewStore)
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;

    Ok(pool)
}
