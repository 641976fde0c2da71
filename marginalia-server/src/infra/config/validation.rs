use axum::http::{HeaderName, Method};
use thiserror::Error;
use url::Url;

use super::models::{Config, CorsConfig, StoreBackend};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("DATABASE_URL is required when the postgres store backend is selected")]
    MissingDatabaseUrl,
    #[error("invalid DATABASE_URL: {reason}")]
    InvalidDatabaseUrl { reason: String },
    #[error("CORS wildcard origins are not allowed when DEV_MODE is false")]
    DangerousCorsWildcard,
    #[error("invalid CORS configuration: {reason}")]
    InvalidCorsConfig { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(&mut self, message: S, hint: H) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(config: &Config) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    match config.database.backend {
        StoreBackend::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .ok_or(ConfigGuardRailError::MissingDatabaseUrl)?;
            validate_database_url(url)?;
        }
        StoreBackend::Memory => {
            warnings.push_with_hint(
                "In-memory store selected; books and notes are lost on shutdown",
                "Set STORE_BACKEND=postgres and DATABASE_URL for persistence",
            );
            if config.database.url.is_some() {
                warnings.push("DATABASE_URL is ignored by the in-memory store");
            }
        }
    }

    let pool = &config.database.pool;
    if pool.min_connections > pool.max_connections {
        warnings.push(format!(
            "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({}); the pool will cap at the maximum",
            pool.min_connections, pool.max_connections
        ));
    }

    if !config.dev_mode && config.cors.is_wildcard_included() {
        return Err(ConfigGuardRailError::DangerousCorsWildcard);
    }

    validate_cors(&config.cors)?;

    Ok(warnings)
}

fn validate_database_url(raw: &str) -> Result<(), ConfigGuardRailError> {
    let parsed = Url::parse(raw).map_err(|err| ConfigGuardRailError::InvalidDatabaseUrl {
        reason: err.to_string(),
    })?;

    if !matches!(parsed.scheme(), "postgres" | "postgresql") {
        return Err(ConfigGuardRailError::InvalidDatabaseUrl {
            reason: format!("unsupported scheme `{}`", parsed.scheme()),
        });
    }

    if parsed.path().trim_start_matches('/').is_empty() {
        return Err(ConfigGuardRailError::InvalidDatabaseUrl {
            reason: "missing database name".into(),
        });
    }

    Ok(())
}

fn validate_cors(cors: &CorsConfig) -> Result<(), ConfigGuardRailError> {
    if cors.allowed_methods.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason: "CORS_ALLOWED_METHODS must include at least one HTTP method".into(),
        });
    }

    for method in &cors.allowed_methods {
        Method::from_bytes(method.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!("invalid HTTP method `{method}` in CORS_ALLOWED_METHODS"),
            }
        })?;
    }

    for header in &cors.allowed_headers {
        HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!("invalid header name `{header}` in CORS_ALLOWED_HEADERS"),
            }
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres_config(url: Option<&str>) -> Config {
        let mut config = Config::development();
        config.database.backend = StoreBackend::Postgres;
        config.database.url = url.map(String::from);
        config
    }

    #[test]
    fn postgres_requires_url() {
        let err = apply_guard_rails(&postgres_config(None)).unwrap_err();
        assert!(matches!(err, ConfigGuardRailError::MissingDatabaseUrl));
    }

    #[test]
    fn postgres_url_needs_scheme_and_database() {
        let err = apply_guard_rails(&postgres_config(Some("mysql://localhost/books"))).unwrap_err();
        assert!(matches!(err, ConfigGuardRailError::InvalidDatabaseUrl { .. }));

        let err = apply_guard_rails(&postgres_config(Some("postgres://localhost"))).unwrap_err();
        assert!(matches!(err, ConfigGuardRailError::InvalidDatabaseUrl { .. }));

        let warnings =
            apply_guard_rails(&postgres_config(Some("postgresql://me@localhost/books"))).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn memory_backend_warns_about_persistence() {
        let warnings = apply_guard_rails(&Config::development()).unwrap();
        assert_eq!(warnings.items.len(), 1);
        assert!(warnings.items[0].hint.is_some());
    }

    #[test]
    fn wildcard_cors_rejected_outside_dev_mode() {
        let mut config = Config::development();
        config.cors.allowed_origins = vec!["*".into()];
        assert!(apply_guard_rails(&config).is_ok());

        config.dev_mode = false;
        let err = apply_guard_rails(&config).unwrap_err();
        assert!(matches!(err, ConfigGuardRailError::DangerousCorsWildcard));
    }

    #[test]
    fn rejects_malformed_cors_method() {
        let mut config = Config::development();
        config.cors.allowed_methods = vec!["GET".into(), "NOT A METHOD".into()];
        let err = apply_guard_rails(&config).unwrap_err();
        assert!(matches!(err, ConfigGuardRailError::InvalidCorsConfig { .. }));
    }
}
