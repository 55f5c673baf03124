use std::env;
use std::str::FromStr;

/// Which `BlogStore` backs the running service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::Invalid {
                key: "STORE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Reads the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 3003)?;
        let store = match lookup("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => StoreBackend::Mongo,
        };

        // APP_ENV=test points the service at the test database
        let uri_key = match lookup("APP_ENV").as_deref() {
            Some("test") => "TEST_MONGODB_URI",
            _ => "MONGODB_URI",
        };
        let mongodb_uri = lookup(uri_key);
        if store == StoreBackend::Mongo && mongodb_uri.is_none() {
            return Err(ConfigError::Missing(uri_key));
        }

        let jwt_secret = lookup("SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("SECRET"))?;

        Ok(Config {
            host,
            port,
            store,
            mongodb_uri,
            mongodb_database: lookup("MONGODB_DATABASE"),
            jwt_secret,
            token_ttl_secs: parse_or(&lookup, "TOKEN_TTL_SECS", 60 * 60)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", 10)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
