//! Environment-driven server settings.

use std::env;
use std::net::SocketAddr;

use chrono::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_RADIUS_METERS: f64 = 100.0;
const DEFAULT_RETENTION_SECS: i64 = 24 * 60 * 60;

/// Configuration failures surfaced at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value that does not parse.
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
    /// A variable required by the selected backend is missing.
    #[error("missing required variable: {name}")]
    MissingValue {
        /// Variable name.
        name: &'static str,
    },
}

/// Which message store backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process store for local development; data does not survive a
    /// restart.
    Memory,
    /// PostgreSQL scan store: durable rows, no spatial prefilter.
    Scan {
        /// Connection string for the pool.
        database_url: String,
    },
    /// PostgreSQL indexed store with the bounding-box prefilter.
    Postgres {
        /// Connection string for the pool.
        database_url: String,
    },
}

/// Settings resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Selected storage backend.
    pub backend: StoreBackend,
    /// Nearby query radius in meters.
    pub radius_meters: f64,
    /// Message retention window.
    pub retention: Duration,
    /// Whether release builds may fall back to the fixture token verifier.
    pub allow_fixture_auth: bool,
}

fn parse_var<T, F>(name: &'static str, default: T, parse: F) -> Result<T, ConfigError>
where
    F: FnOnce(&str) -> Option<T>,
{
    match env::var(name) {
        Ok(raw) => parse(&raw).ok_or(ConfigError::InvalidValue { name, value: raw }),
        Err(_) => Ok(default),
    }
}

impl ServerSettings {
    /// Resolve settings from `GEONOTE_*` environment variables, falling back
    /// to defaults: memory backend, port 8080, 100 m radius, 24 h retention.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a variable fails to parse or a
    /// database-backed store is selected without `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = parse_var("GEONOTE_BIND_ADDR", default_bind_addr(), |raw| {
            raw.parse().ok()
        })?;

        let backend = match env::var("GEONOTE_BACKEND").as_deref() {
            Err(_) | Ok("memory") => StoreBackend::Memory,
            Ok("scan") => StoreBackend::Scan {
                database_url: require_database_url()?,
            },
            Ok("postgres") => StoreBackend::Postgres {
                database_url: require_database_url()?,
            },
            Ok(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "GEONOTE_BACKEND",
                    value: other.to_owned(),
                });
            }
        };

        let radius_meters = parse_var("GEONOTE_NEARBY_RADIUS_M", DEFAULT_RADIUS_METERS, |raw| {
            raw.parse::<f64>().ok().filter(|radius| *radius > 0.0)
        })?;

        let retention = parse_var(
            "GEONOTE_RETENTION_SECS",
            Duration::seconds(DEFAULT_RETENTION_SECS),
            |raw| {
                raw.parse::<i64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .map(Duration::seconds)
            },
        )?;

        // Absent or anything but "1" means off; the fixture verifier never
        // activates in a release build by accident.
        let allow_fixture_auth =
            env::var("GEONOTE_ALLOW_FIXTURE_AUTH").is_ok_and(|raw| raw == "1");

        Ok(Self {
            bind_addr,
            backend,
            radius_meters,
            retention,
            allow_fixture_auth,
        })
    }
}

fn require_database_url() -> Result<String, ConfigError> {
    env::var("DATABASE_URL").map_err(|_| ConfigError::MissingValue {
        name: "DATABASE_URL",
    })
}

fn default_bind_addr() -> SocketAddr {
    DEFAULT_BIND_ADDR
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080)))
}
