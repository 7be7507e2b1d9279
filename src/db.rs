use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::config::AppConfig;

/// Opens the shared pool used for the whole process lifetime.
pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;
    info!(max_connections = config.max_connections, "database connected");
    Ok(db)
}

pub async fn migrate(db: &PgPool) {
    match sqlx::migrate!("./migrations").run(db).await {
        Ok(()) => info!("migrations applied"),
        Err(e) => warn!(error = %e, "migration failed; continuing"),
    }
}
