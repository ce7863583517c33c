//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `RIZA_*` environment variables.
//! Assisted-ranking settings live in [`crate::llm::AssistConfig`].

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RIZA_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding `riza.db` and `admin.db`. Default: `./data`.
    pub data_dir: PathBuf,

    /// Idle lifetime of a login session. Default: 8 hours.
    pub session_ttl: Duration,

    /// Administrator created at startup when the users table is empty.
    pub bootstrap_admin: Option<AdminBootstrap>,
}

/// Credentials for the first administrator account.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// File name of the descriptor/observation database.
pub const CATALOGUE_DB_FILE: &str = "riza.db";
/// File name of the users/activity database.
pub const ADMIN_DB_FILE: &str = "admin.db";

/// Default session idle timeout in seconds.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            data_dir: PathBuf::from("./data"),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            bootstrap_admin: None,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "RIZA_PORT";
    const ENV_BIND_ADDR: &'static str = "RIZA_BIND_ADDR";
    const ENV_DATA_DIR: &'static str = "RIZA_DATA_DIR";
    const ENV_SESSION_TTL_SECS: &'static str = "RIZA_SESSION_TTL_SECS";
    const ENV_ADMIN_EMAIL: &'static str = "RIZA_ADMIN_EMAIL";
    const ENV_ADMIN_PASSWORD: &'static str = "RIZA_ADMIN_PASSWORD";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let data_dir = Self::parse_path_from_env(Self::ENV_DATA_DIR, defaults.data_dir);
        let session_ttl = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_SESSION_TTL_SECS,
            defaults.session_ttl.as_secs(),
        ));
        let bootstrap_admin = Self::parse_admin_bootstrap_from_env()?;

        Ok(Self {
            port,
            bind_addr,
            data_dir,
            session_ttl,
            bootstrap_admin,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_ttl.is_zero() {
            return Err(ConfigError::InvalidSessionTtl);
        }
        if self.data_dir.exists() && !self.data_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.data_dir.clone(),
            });
        }
        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn catalogue_db_path(&self) -> PathBuf {
        self.data_dir.join(CATALOGUE_DB_FILE)
    }

    pub fn admin_db_path(&self) -> PathBuf {
        self.data_dir.join(ADMIN_DB_FILE)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_admin_bootstrap_from_env() -> Result<Option<AdminBootstrap>, ConfigError> {
        let email = Self::parse_optional_string_from_env(Self::ENV_ADMIN_EMAIL);
        let password = Self::parse_optional_string_from_env(Self::ENV_ADMIN_PASSWORD);

        match (email, password) {
            (Some(email), Some(password)) => Ok(Some(AdminBootstrap { email, password })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::IncompleteAdminBootstrap {
                present: Self::ENV_ADMIN_EMAIL,
                missing: Self::ENV_ADMIN_PASSWORD,
            }),
            (None, Some(_)) => Err(ConfigError::IncompleteAdminBootstrap {
                present: Self::ENV_ADMIN_PASSWORD,
                missing: Self::ENV_ADMIN_EMAIL,
            }),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
