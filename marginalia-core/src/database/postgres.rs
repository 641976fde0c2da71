use std::{fmt, path::Path, time::Duration};

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};
use tracing::{debug, info};

use crate::database::infrastructure::postgres::{
    PostgresBookRepository, PostgresNoteRepository,
};
use crate::error::{Result, TrackerError};

/// Statistics about the connection pool
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_size: u32,
    pub min_idle: u32,
}

/// Connection pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    settings: PoolSettings,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.settings.max_connections)
            .field("min_connections", &self.settings.min_connections)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn connect(connection_string: &str, settings: PoolSettings) -> Result<Self> {
        let connect_options = Self::build_connect_options(connection_string)?;
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| TrackerError::Store(format!("Database connection failed: {e}")))?;

        info!(
            "Database pool initialized with max_connections={}, min_connections={}",
            settings.max_connections, settings.min_connections
        );

        Ok(Self { pool, settings })
    }

    /// Create a PostgresDatabase from an existing pool (mainly for testing)
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            settings: PoolSettings::default(),
        }
    }

    fn build_connect_options(connection_string: &str) -> Result<PgConnectOptions> {
        let trimmed = connection_string.trim();

        let mut options = if trimmed.is_empty() {
            PgConnectOptions::new()
        } else {
            trimmed.parse::<PgConnectOptions>().map_err(|e| {
                TrackerError::Store(format!("Invalid PostgreSQL connection string: {e}"))
            })?
        };

        // A socket directory in PGHOST overrides whatever host the DSN carried.
        if let Ok(host) = std::env::var("PGHOST")
            && host.starts_with('/')
        {
            options = options.socket(Path::new(&host));
            debug!("Using PostgreSQL socket from PGHOST at {}", host);
            if std::env::var("PGSSLMODE").is_err() {
                options = options.ssl_mode(PgSslMode::Disable);
            }
        }

        Ok(options)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle() as u32,
            max_size: self.settings.max_connections,
            min_idle: self.settings.min_connections,
        }
    }

    pub fn books(&self) -> PostgresBookRepository {
        PostgresBookRepository::new(self.pool.clone())
    }

    pub fn notes(&self) -> PostgresNoteRepository {
        PostgresNoteRepository::new(self.pool.clone())
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        crate::MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| TrackerError::Store(format!("Migration failed: {e}")))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Round-trip a trivial query to prove the pool can reach the server.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| TrackerError::Store(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Close every pooled connection. Later queries fail with a store error.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
