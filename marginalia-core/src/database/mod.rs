pub mod context;
pub mod infrastructure;
pub mod ports;
#[cfg(feature = "database")]
pub mod postgres;

pub use context::StoreContext;
#[cfg(feature = "database")]
pub use postgres::{PoolSettings, PoolStats, PostgresDatabase};
