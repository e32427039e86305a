use std::str::FromStr;

use ecoleta_core::image_store::DEFAULT_MAX_IMAGE_BYTES;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3333`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Whole-request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on each storage call (image write or DB round trip).
    pub storage_timeout_secs: u64,
    /// Directory stored images are written to and served from.
    pub uploads_dir: String,
    /// Bundled catalog icons, served under the same path as uploads.
    pub assets_dir: String,
    /// Origin used when building public image URLs.
    pub public_base_url: String,
    /// Largest accepted image upload, in bytes.
    pub max_upload_bytes: usize,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                  |
    /// |---------------------------|--------------------------|
    /// | `HOST`                    | `0.0.0.0`                |
    /// | `PORT`                    | `3333`                   |
    /// | `CORS_ORIGINS`            | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                     |
    /// | `STORAGE_TIMEOUT_SECS`    | `10`                     |
    /// | `UPLOADS_DIR`             | `uploads`                |
    /// | `ASSETS_DIR`              | `assets/items`           |
    /// | `PUBLIC_BASE_URL`         | `http://localhost:3333`  |
    /// | `MAX_UPLOAD_BYTES`        | `5242880`                |
    /// | `DB_MAX_CONNECTIONS`      | `20`                     |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `5`                      |
    ///
    /// Panics on unparseable numeric values so misconfiguration fails at
    /// startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".into()),
        );

        Self {
            host,
            port: env_or("PORT", 3333),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            storage_timeout_secs: env_or("STORAGE_TIMEOUT_SECS", 10),
            uploads_dir: std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".into()),
            assets_dir: std::env::var("ASSETS_DIR").unwrap_or_else(|_| "assets/items".into()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3333".into()),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_IMAGE_BYTES),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", ecoleta_db::DEFAULT_MAX_CONNECTIONS),
            db_acquire_timeout_secs: env_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                ecoleta_db::DEFAULT_ACQUIRE_TIMEOUT.as_secs(),
            ),
        }
    }
}

/// Read `key` and parse it, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn unset_variable_uses_default() {
        let port: u16 = env_or("ECOLETA_TEST_UNSET_PORT", 3333);
        assert_eq!(port, 3333);
    }
}
