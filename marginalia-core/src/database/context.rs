use std::fmt;
use std::sync::Arc;

use crate::application::unit_of_work::AppUnitOfWork;
#[cfg(feature = "database")]
use crate::database::postgres::{PoolSettings, PostgresDatabase};
use crate::error::Result;

#[derive(Clone)]
enum Backend {
    #[cfg(feature = "database")]
    Postgres(Arc<PostgresDatabase>),
    Memory,
}

/// Bundles the live store handle with the application-facing unit of work.
///
/// Handlers reach the repositories through [`StoreContext::unit_of_work`];
/// process wiring uses the rest to probe and release the store.
#[derive(Clone)]
pub struct StoreContext {
    backend: Backend,
    unit_of_work: Arc<AppUnitOfWork>,
}

impl fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreContext")
            .field("backend", &self.backend_name())
            .field("unit_of_work", &self.unit_of_work)
            .finish()
    }
}

impl StoreContext {
    /// Establish a PostgreSQL pool and compose the default unit of work.
    #[cfg(feature = "database")]
    pub async fn connect_postgres(connection_string: &str, settings: PoolSettings) -> Result<Self> {
        let postgres = Arc::new(PostgresDatabase::connect(connection_string, settings).await?);
        Ok(Self::from_postgres(postgres))
    }

    /// Compose a store context from an existing Postgres adapter.
    #[cfg(feature = "database")]
    pub fn from_postgres(postgres: Arc<PostgresDatabase>) -> Self {
        let unit_of_work = Arc::new(AppUnitOfWork::from_postgres(&postgres));
        Self {
            backend: Backend::Postgres(postgres),
            unit_of_work,
        }
    }

    /// A fresh, empty process-local store.
    pub fn in_memory() -> Self {
        Self::from_unit_of_work(AppUnitOfWork::in_memory())
    }

    /// Wrap caller-assembled repositories. Treated as process-local.
    pub fn from_unit_of_work(unit_of_work: AppUnitOfWork) -> Self {
        Self {
            backend: Backend::Memory,
            unit_of_work: Arc::new(unit_of_work),
        }
    }

    pub fn unit_of_work(&self) -> Arc<AppUnitOfWork> {
        Arc::clone(&self.unit_of_work)
    }

    #[cfg(feature = "database")]
    pub fn postgres(&self) -> Option<Arc<PostgresDatabase>> {
        match &self.backend {
            Backend::Postgres(postgres) => Some(Arc::clone(postgres)),
            Backend::Memory => None,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            #[cfg(feature = "database")]
            Backend::Postgres(_) => "postgres",
            Backend::Memory => "memory",
        }
    }

    /// Probe the store. Process-local stores are always reachable.
    pub async fn health_check(&self) -> Result<()> {
        match &self.backend {
            #[cfg(feature = "database")]
            Backend::Postgres(postgres) => postgres.ping().await,
            Backend::Memory => Ok(()),
        }
    }

    /// Release the store's connections. Call once, after in-flight requests
    /// have drained.
    pub async fn shutdown(&self) {
        match &self.backend {
            #[cfg(feature = "database")]
            Backend::Postgres(postgres) => postgres.close().await,
            Backend::Memory => tracing::debug!("in-memory store released"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_context_is_always_healthy() {
        let context = StoreContext::in_memory();
        assert_eq!(context.backend_name(), "memory");
        context.health_check().await.unwrap();
        context.shutdown().await;
    }
}
