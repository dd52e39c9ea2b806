use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::accounts::repo::{AccountStore, PgAccountStore};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        // Run migrations if present
        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migrations folder not found or migration failed; continuing");
        }

        let store = Arc::new(PgAccountStore::new(db)) as Arc<dyn AccountStore>;
        Ok(Self { store, config })
    }

    pub fn from_parts(store: Arc<dyn AccountStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }
}
