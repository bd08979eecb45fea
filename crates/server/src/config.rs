//! Server configuration loaded from the environment.

use deckgen_core::{Result, SlideSource};
use deckgen_llm::ModelConfig;
use std::net::SocketAddr;

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5009;
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];

/// Settings for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,

    /// Browser origins allowed to call the API.
    pub cors_origins: Vec<String>,

    /// Source used when a request does not name one.
    pub default_source: SlideSource,

    pub model: ModelConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            default_source: SlideSource::default(),
            model: ModelConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from `DECKGEN_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    ///
    /// An unparsable port falls back to the default. An unknown source name
    /// is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port = match lookup("DECKGEN_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid DECKGEN_PORT {:?}", raw);
                defaults.port
            }),
            None => defaults.port,
        };

        let cors_origins = match lookup("DECKGEN_CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.cors_origins,
        };

        let default_source = match lookup("DECKGEN_SOURCE") {
            Some(raw) => raw.parse()?,
            None => defaults.default_source,
        };

        Ok(Self {
            bind: lookup("DECKGEN_BIND").unwrap_or(defaults.bind),
            port,
            cors_origins,
            default_source,
            model: ModelConfig::from_lookup(&lookup),
        })
    }

    /// Socket address to listen on.
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_core::Error;

    fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 5009);
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
        assert_eq!(config.default_source, SlideSource::Heuristic);
        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:5009");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("DECKGEN_BIND", "0.0.0.0"),
            ("DECKGEN_PORT", "8080"),
            ("DECKGEN_CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("DECKGEN_SOURCE", "Model"),
            ("DECKGEN_API_KEY", "k"),
        ]))
        .unwrap();
        assert_eq!(config.addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.default_source, SlideSource::Model);
        assert_eq!(config.model.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = ServerConfig::from_lookup(lookup_from(&[("DECKGEN_PORT", "http")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_unknown_source_is_error() {
        let result = ServerConfig::from_lookup(lookup_from(&[("DECKGEN_SOURCE", "oracle")]));
        assert!(matches!(result, Err(Error::UnknownSource(_))));
    }

    #[test]
    fn test_bad_bind_address() {
        let config = ServerConfig {
            bind: "not an address".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.addr().is_err());
    }
}
