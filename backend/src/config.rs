use serde::Deserialize;
use std::path::Path;
use url::Url;

pub const DEFAULT_AI_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONFIG_PATH: &str = "config/application.yaml";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    server: ServerSection,
    ai: AiSection,
    auth: AuthSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AiSection {
    service: AiServiceSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AiServiceSection {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthSection {
    jwt_secret: Option<String>,
    token_ttl_hours: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the classification service, without a trailing slash.
    pub ai_service_url: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl AppConfig {
    /// Defaults, then the YAML file, then environment variables.
    ///
    /// The file is read from `CONFIG_PATH` when set (and must exist then),
    /// otherwise from `config/application.yaml` if present.
    pub fn load() -> Result<Self, ConfigError> {
        let yaml = match std::env::var("CONFIG_PATH") {
            Ok(path) => Some(read_file(&path)?),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Some(read_file(DEFAULT_CONFIG_PATH)?)
            }
            Err(_) => None,
        };
        Self::from_sources(yaml.as_deref(), |key| std::env::var(key).ok())
    }

    pub fn from_sources<F>(yaml: Option<&str>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: FileConfig = match yaml {
            Some(text) if !text.trim().is_empty() => serde_yaml::from_str(text)?,
            _ => FileConfig::default(),
        };

        let host = env("HOST")
            .or(file.server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match env("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: e.to_string(),
            })?,
            None => file.server.port.unwrap_or(DEFAULT_PORT),
        };

        let raw_url = env("AI_SERVICE_URL")
            .or(file.ai.service.url)
            .unwrap_or_else(|| DEFAULT_AI_SERVICE_URL.to_string());
        let ai_service_url = validate_service_url(&raw_url)?;

        let jwt_secret = env("JWT_SECRET")
            .or(file.auth.jwt_secret)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let token_ttl_hours = match env("TOKEN_TTL_HOURS") {
            Some(raw) => raw.parse::<i64>().map_err(|e| ConfigError::Invalid {
                key: "TOKEN_TTL_HOURS",
                reason: e.to_string(),
            })?,
            None => file.auth.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS),
        };
        if token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_HOURS",
                reason: "must be positive".to_string(),
            });
        }

        Ok(Self {
            host,
            port,
            ai_service_url,
            jwt_secret,
            token_ttl_hours,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn read_file(path: &str) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })
}

fn validate_service_url(raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        key: "ai.service.url",
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key: "ai.service.url",
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_file() {
        let config = AppConfig::from_sources(None, env_of(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.ai_service_url, "http://localhost:8000");
        assert_eq!(config.port, 8081);
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
    }

    #[test]
    fn yaml_overrides_defaults_and_env_overrides_yaml() {
        let yaml = r#"
server:
  port: 9000
ai:
  service:
    url: http://classifier:8000/
auth:
  jwt_secret: from-file
"#;
        let config = AppConfig::from_sources(Some(yaml), env_of(&[])).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.ai_service_url, "http://classifier:8000");
        assert_eq!(config.jwt_secret, "from-file");

        let config = AppConfig::from_sources(
            Some(yaml),
            env_of(&[("AI_SERVICE_URL", "https://ml.internal"), ("PORT", "7000")]),
        )
        .unwrap();
        assert_eq!(config.ai_service_url, "https://ml.internal");
        assert_eq!(config.port, 7000);
    }

    #[test]
    fn jwt_secret_is_required() {
        let err = AppConfig::from_sources(None, env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn rejects_non_http_service_url() {
        let err = AppConfig::from_sources(
            None,
            env_of(&[("JWT_SECRET", "x"), ("AI_SERVICE_URL", "ftp://host")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ai.service.url", .. }));

        let err = AppConfig::from_sources(
            None,
            env_of(&[("JWT_SECRET", "x"), ("AI_SERVICE_URL", "not a url")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_bad_port() {
        let err =
            AppConfig::from_sources(None, env_of(&[("JWT_SECRET", "x"), ("PORT", "http")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
