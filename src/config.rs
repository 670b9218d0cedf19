use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: String,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(alias = "baseurl", default = "default_base_url")]
    pub base_url: String,
    #[serde(alias = "apikey", default)]
    pub api_key: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CorsConfig {
    /// Allowed cross-origin source. `None` or `*` allows any origin.
    #[serde(default)]
    pub origin: Option<String>,
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> String {
    "3001".to_string()
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

impl Config {
    /// Load configuration: defaults, then the optional YAML file, then the
    /// process environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|key| std::env::var(key).ok()).validated()
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        Ok(config)
    }

    /// Apply overrides from an environment lookup. Empty values are ignored.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT") {
            self.listen.port = port;
        }
        if let Some(address) = get("LISTEN_ADDRESS") {
            self.listen.address = address;
        }
        if let Some(base_url) = get("TMDB_BASE_URL") {
            self.tmdb.base_url = base_url;
        }
        if let Some(api_key) = get("TMDB_API_KEY") {
            self.tmdb.api_key = Some(api_key);
        }
        if let Some(origin) = get("CORS_ORIGIN") {
            self.cors.origin = Some(origin);
        }
        self
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.api_key().is_none() {
            return Err(ConfigError::MissingApiKey);
        }
        self.socket_addr()?;
        self.cors_allow_origin()?;
        Ok(self)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.tmdb
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// The configured origin, or `None` when any origin is allowed.
    pub fn cors_origin(&self) -> Option<&str> {
        self.cors
            .origin
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty() && *o != "*")
    }

    /// The origin as a header value, or `None` when any origin is allowed.
    pub fn cors_allow_origin(&self) -> Result<Option<HeaderValue>, ConfigError> {
        self.cors_origin()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| ConfigError::InvalidCorsOrigin(origin.to_string()))
            })
            .transpose()
    }

    /// Listen address. IPv6 hosts may be given bare (`::`) or bracketed (`[::]`).
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.listen.address.trim();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        let ip: IpAddr = host
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.listen.address.clone()))?;
        let port: u16 = self
            .listen
            .port
            .parse()
            .map_err(|_| ConfigError::InvalidPort(self.listen.port.clone()))?;
        Ok(SocketAddr::new(ip, port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            tmdb: TmdbConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("No TMDB API key configured (set TMDB_API_KEY)")]
    MissingApiKey,
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),
    #[error("Invalid listen port: {0}")]
    InvalidPort(String),
    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
}
