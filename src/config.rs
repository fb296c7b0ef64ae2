use std::fmt;

use thiserror::Error;

pub const DEFAULT_DB_NAME: &str = "musicdb.db";
pub const DEFAULT_DB_USER: &str = "music_admin";
pub const DEFAULT_DB_PASSWORD: &str = "music-password";
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_RECORD_COUNT: usize = 50_000;
pub const DEFAULT_SCHEMA: &str = "vibesia_schema";

const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("host {0:?} is not local; the embedded engine only opens local database files")]
    RemoteHost(String),
}

/// Runtime settings for a seeding run.
///
/// The recognised options mirror a classic database connection block plus
/// the number of records to generate. `seed` pins the random source for
/// reproducible runs; `schema` is the namespace every table lives under.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub record_count: usize,
    pub seed: Option<u64>,
    pub schema: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            dbname: DEFAULT_DB_NAME.to_string(),
            user: DEFAULT_DB_USER.to_string(),
            password: DEFAULT_DB_PASSWORD.to_string(),
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            record_count: DEFAULT_RECORD_COUNT,
            seed: None,
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }
}

impl fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedConfig")
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("record_count", &self.record_count)
            .field("seed", &self.seed)
            .field("schema", &self.schema)
            .finish()
    }
}

impl SeedConfig {
    /// Build a config from the process environment (after `.env` loading).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, falling back to defaults for
    /// missing keys, then validate it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            dbname: lookup("PLAYBACK_DB_NAME").unwrap_or(defaults.dbname),
            user: lookup("PLAYBACK_DB_USER").unwrap_or(defaults.user),
            password: lookup("PLAYBACK_DB_PASSWORD").unwrap_or(defaults.password),
            host: lookup("PLAYBACK_DB_HOST").unwrap_or(defaults.host),
            port: match lookup("PLAYBACK_DB_PORT") {
                Some(raw) => parse_port(&raw)?,
                None => defaults.port,
            },
            record_count: match lookup("PLAYBACK_RECORD_COUNT") {
                Some(raw) => parse_record_count(&raw)?,
                None => defaults.record_count,
            },
            seed: match lookup("PLAYBACK_SEED") {
                Some(raw) => Some(raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: "PLAYBACK_SEED",
                    value: raw.clone(),
                    reason: "expected an unsigned 64-bit integer",
                })?),
                None => None,
            },
            schema: lookup("PLAYBACK_SCHEMA").unwrap_or(defaults.schema),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn with_dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = dbname.into();
        self
    }

    pub fn with_record_count(mut self, record_count: usize) -> Self {
        self.record_count = record_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dbname.trim().is_empty() {
            return Err(ConfigError::Empty("dbname"));
        }
        if self.user.trim().is_empty() {
            return Err(ConfigError::Empty("user"));
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::Empty("host"));
        }
        if !LOCAL_HOSTS.contains(&self.host.as_str()) {
            return Err(ConfigError::RemoteHost(self.host.clone()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid {
                key: "port",
                value: "0".to_string(),
                reason: "port must be non-zero",
            });
        }
        if self.record_count == 0 {
            return Err(ConfigError::Invalid {
                key: "record_count",
                value: "0".to_string(),
                reason: "at least one record must be generated",
            });
        }
        if !is_sql_identifier(&self.schema) {
            return Err(ConfigError::Invalid {
                key: "schema",
                value: self.schema.clone(),
                reason: "expected a plain SQL identifier",
            });
        }
        Ok(())
    }

    /// Connection target for log lines, never including the password.
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.dbname)
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key: "PLAYBACK_DB_PORT",
        value: raw.to_string(),
        reason: "expected a port number between 1 and 65535",
    })
}

fn parse_record_count(raw: &str) -> Result<usize, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key: "PLAYBACK_RECORD_COUNT",
        value: raw.to_string(),
        reason: "expected a positive integer",
    })
}

/// `[A-Za-z_][A-Za-z0-9_]*`, safe to splice into SQL text unquoted.
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
