//! Layered configuration loading.

use std::env;
use std::fs;
use std::path::Path;

use crate::schema::LogFormat;
use crate::{AgoraConfig, ConfigError};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "AGORA";

/// Configuration loader with layered approach.
///
/// Later layers override earlier ones:
/// 1. Default values
/// 2. Configuration file (TOML or JSON)
/// 3. `.env` file, merged into the process environment
/// 4. Environment variables `PREFIX__SECTION__KEY`
///
/// # Example
///
/// ```no_run
/// use agora_config::ConfigLoader;
///
/// # fn main() -> Result<(), agora_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("storefront.toml")?
///     .with_dotenv()?
///     .with_env_prefix("AGORA")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: AgoraConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a loader holding the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from [`AgoraConfig::development`].
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = AgoraConfig::development();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format follows the extension: `.toml` or `.json`. Keys the file
    /// leaves out keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed
    /// or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
        self.config = parse(&content, format)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format (`toml` or
    /// `json`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use agora_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string("[server]\nhttp_addr = \"127.0.0.1:8000\"\n", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:8000");
    /// assert_eq!(config.site.secure_host_token, "3000");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, format)?;
        Ok(self)
    }

    /// Load a `.env` file from the current directory, if there is one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Enable environment overrides under `prefix`.
    ///
    /// With prefix `AGORA`, `AGORA__SERVER__HTTP_ADDR=0.0.0.0:9000` sets
    /// `server.http_addr`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Apply overrides, validate and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override cannot be parsed or the result
    /// fails [`AgoraConfig::validate`].
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Write;
    ///
    /// use agora_config::ConfigLoader;
    ///
    /// let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    /// writeln!(file, "[site]\nsecure_host_token = \"4000\"").unwrap();
    ///
    /// let config = ConfigLoader::new()
    ///     .with_file(file.path())
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.site.secure_host_token, "4000");
    /// assert_eq!(config.server.http_addr, "0.0.0.0:3000");
    /// ```
    pub fn load(mut self) -> Result<AgoraConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_overrides(&prefix, env::vars())?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Return the configuration without overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> AgoraConfig {
        self.config
    }

    fn apply_overrides<I>(&mut self, prefix: &str, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let head = format!("{prefix}__");
        for (key, value) in vars {
            if let Some(path) = key.strip_prefix(&head) {
                self.apply_override(&key, path, &value)?;
            }
        }
        Ok(())
    }

    fn apply_override(&mut self, key: &str, path: &str, value: &str) -> Result<(), ConfigError> {
        let parts: Vec<&str> = path.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                config.server.shutdown_timeout_secs = parse_number(key, value)?;
            }
            ["SERVER", "REQUEST_TIMEOUT_MS"] => {
                config.server.request_timeout_ms = parse_number(key, value)?;
            }
            ["SERVER", "MAX_BODY_BYTES"] => {
                config.server.max_body_bytes = parse_number(key, value)?;
            }

            ["LOGGING", "ENABLED"] => {
                config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => return Err(ConfigError::env_parse_error(key, "expected 'json' or 'pretty'")),
                };
            }
            ["LOGGING", "INCLUDE_LOCATION"] => {
                config.logging.include_location = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            ["SITE", "STATIC_DIR"] => config.site.static_dir = value.into(),
            ["SITE", "TEMPLATES_DIR"] => config.site.templates_dir = value.into(),
            ["SITE", "SECURE_HOST_TOKEN"] => config.site.secure_host_token = value.to_string(),

            _ => return Err(ConfigError::env_parse_error(key, "unknown configuration key")),
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<AgoraConfig, ConfigError> {
    match format.to_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, AgoraConfig::default());
    }

    #[test]
    fn test_toml_file_with_partial_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nmax_body_bytes = 2048\n\n[site]\nstatic_dir = \"/srv/storage\""
        )
        .unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(config.server.max_body_bytes, 2048);
        assert_eq!(config.server.http_addr, "0.0.0.0:3000");
        assert_eq!(config.site.static_dir, PathBuf::from("/srv/storage"));
        assert_eq!(config.site.templates_dir, PathBuf::from("templates"));
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"logging": {{"format": "pretty", "level": "warn"}}}}"#).unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_missing_and_optional_files() {
        let err = ConfigLoader::new().with_file("/nonexistent/agora.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/agora.toml")
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config, AgoraConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_unknown_key_in_file() {
        let err = ConfigLoader::new()
            .with_string("[server]\nport = 80\n", "toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::TomlError(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_overrides(
                "AGORA",
                vars(&[
                    ("AGORA__SERVER__HTTP_ADDR", "127.0.0.1:9000"),
                    ("AGORA__SERVER__MAX_BODY_BYTES", "512"),
                    ("AGORA__LOGGING__FORMAT", "PRETTY"),
                    ("AGORA__LOGGING__ENABLED", "off"),
                    ("AGORA__SITE__SECURE_HOST_TOKEN", "4000"),
                    ("PATH", "/usr/bin"),
                    ("AGORAX__SERVER__HTTP_ADDR", "ignored"),
                ]),
            )
            .unwrap();

        let config = loader.load_unvalidated();
        assert_eq!(config.server.http_addr, "127.0.0.1:9000");
        assert_eq!(config.server.max_body_bytes, 512);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(!config.logging.enabled);
        assert_eq!(config.site.secure_host_token, "4000");
    }

    #[test]
    fn test_env_override_errors() {
        let mut loader = ConfigLoader::new();
        let err = loader
            .apply_overrides("AGORA", vars(&[("AGORA__SERVER__REQUEST_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvParseError { .. }));

        let err = loader
            .apply_overrides("AGORA", vars(&[("AGORA__SERVER__PORT", "80")]))
            .unwrap_err();
        assert!(err.to_string().contains("unknown configuration key"));
    }

    #[test]
    fn test_load_validates() {
        let err = ConfigLoader::new()
            .with_string(r#"{"server": {"http_addr": "nowhere"}}"#, "json")
            .unwrap()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
