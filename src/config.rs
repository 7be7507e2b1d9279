use std::net::SocketAddr;

use anyhow::{anyhow, Context};

use crate::users::repo_types::UserDeletePolicy;

pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Deployment label used in the startup log line.
    pub app_env: String,
    pub max_connections: u32,
    pub run_migrations: bool,
    pub user_delete_policy: UserDeletePolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let port = match lookup("PORT") {
            Some(v) => v
                .parse::<u16>()
                .with_context(|| format!("invalid PORT {v:?}"))?,
            None => DEFAULT_PORT,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("invalid DATABASE_MAX_CONNECTIONS {v:?}"))?,
            None => 5,
        };

        let run_migrations = lookup("RUN_MIGRATIONS")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        let user_delete_policy = match lookup("USER_DELETE_POLICY") {
            Some(v) => v.parse::<UserDeletePolicy>().map_err(|e| anyhow!(e))?,
            None => UserDeletePolicy::default(),
        };

        Ok(Self {
            database_url,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            app_env: lookup("APP_ENV").unwrap_or_else(|| "development".into()),
            max_connections,
            run_migrations,
            user_delete_policy,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}
