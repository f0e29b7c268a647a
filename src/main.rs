use std::sync::Arc;

use harbour_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, PgReviewStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    harbour_api::init_tracing();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&pool).await?;
    let store = Arc::new(PgReviewStore::new(pool));

    let state = AppState::new(store);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
