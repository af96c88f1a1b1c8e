//! Configuration management for the research agent.
//!
//! Configuration can be set via environment variables:
//! - `GOOGLE_API_KEY` - Gemini API key. Required for the agent to run.
//! - `TAVILY_API_KEY` - Tavily search API key. Required for the agent to run.
//! - `SECRETS_FILE` - Optional. Path to a TOML file holding the two keys
//!   above. Used as a fallback for keys not present in the environment.
//!   Defaults to `secrets.toml` in the working directory.
//! - `RESEARCH_MODEL` - Optional. Gemini model identifier. Defaults to
//!   `gemini-1.5-flash-latest`.
//! - `TEMPERATURE` - Optional. Sampling temperature. Defaults to `0.7`.
//! - `MAX_STEPS` - Optional. Maximum agent loop steps. Defaults to `15`.
//! - `SEARCH_MAX_RESULTS` - Optional. Search results per query. Defaults to `5`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//!
//! Missing API keys are not a startup error: the server comes up in a
//! "not ready" mode that only serves setup instructions until it is
//! restarted with both keys present.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to read secrets file {0}: {1}")]
    SecretsFile(String, String),
}

/// Provider credentials, loaded once at startup.
///
/// Held in the config and passed by reference to the Gemini client and
/// the search tool; never written back into the process environment.
#[derive(Debug, Clone)]
pub struct Secrets {
    /// Gemini API key
    pub google_api_key: String,

    /// Tavily search API key
    pub tavily_api_key: String,
}

/// On-disk shape of the optional secrets file.
#[derive(Debug, Deserialize, Default)]
struct SecretsFile {
    #[serde(rename = "GOOGLE_API_KEY")]
    google_api_key: Option<String>,

    #[serde(rename = "TAVILY_API_KEY")]
    tavily_api_key: Option<String>,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider credentials, if both were found at startup
    pub secrets: Option<Secrets>,

    /// Gemini model identifier
    pub model: String,

    /// Sampling temperature for the reasoning model
    pub temperature: f32,

    /// Maximum think/act steps per research run
    pub max_steps: usize,

    /// Search results requested per query
    pub search_max_results: usize,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// secrets file for the two API keys.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for malformed numeric settings.
    /// Absent API keys are not an error; see [`Config::is_ready`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let secrets_path =
            std::env::var("SECRETS_FILE").unwrap_or_else(|_| "secrets.toml".to_string());
        let secrets = load_secrets(
            std::env::var("GOOGLE_API_KEY").ok(),
            std::env::var("TAVILY_API_KEY").ok(),
            Path::new(&secrets_path),
        )?;

        let model = std::env::var("RESEARCH_MODEL")
            .unwrap_or_else(|_| "gemini-1.5-flash-latest".to_string());

        let temperature = std::env::var("TEMPERATURE")
            .unwrap_or_else(|_| "0.7".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("TEMPERATURE".to_string(), format!("{}", e)))?;

        let max_steps = std::env::var("MAX_STEPS")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_STEPS".to_string(), format!("{}", e)))?;

        let search_max_results = std::env::var("SEARCH_MAX_RESULTS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("SEARCH_MAX_RESULTS".to_string(), format!("{}", e))
            })?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        Ok(Self {
            secrets,
            model,
            temperature,
            max_steps,
            search_max_results,
            host,
            port,
        })
    }

    /// Whether both provider credentials were found at startup.
    ///
    /// When false the UI serves setup instructions and the research
    /// endpoint refuses to run; only a restart with keys present can
    /// change this.
    pub fn is_ready(&self) -> bool {
        self.secrets.is_some()
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(secrets: Option<Secrets>) -> Self {
        Self {
            secrets,
            model: "gemini-1.5-flash-latest".to_string(),
            temperature: 0.7,
            max_steps: 15,
            search_max_results: 5,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Resolve the two credentials: environment first, secrets file second.
///
/// Returns `Ok(None)` when either key is missing from both sources.
fn load_secrets(
    env_google: Option<String>,
    env_tavily: Option<String>,
    secrets_path: &Path,
) -> Result<Option<Secrets>, ConfigError> {
    let file = if secrets_path.exists() {
        let raw = std::fs::read_to_string(secrets_path).map_err(|e| {
            ConfigError::SecretsFile(secrets_path.display().to_string(), format!("{}", e))
        })?;
        toml::from_str::<SecretsFile>(&raw).map_err(|e| {
            ConfigError::SecretsFile(secrets_path.display().to_string(), format!("{}", e))
        })?
    } else {
        SecretsFile::default()
    };

    let google = env_google.or(file.google_api_key).filter(|k| !k.is_empty());
    let tavily = env_tavily.or(file.tavily_api_key).filter(|k| !k.is_empty());

    Ok(match (google, tavily) {
        (Some(google_api_key), Some(tavily_api_key)) => Some(Secrets {
            google_api_key,
            tavily_api_key,
        }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn env_keys_make_config_ready() {
        let secrets = load_secrets(
            Some("g-key".to_string()),
            Some("t-key".to_string()),
            Path::new("/nonexistent/secrets.toml"),
        )
        .expect("load secrets")
        .expect("both keys present");

        assert_eq!(secrets.google_api_key, "g-key");
        assert_eq!(secrets.tavily_api_key, "t-key");
    }

    #[test]
    fn missing_key_is_not_ready_but_not_an_error() {
        let secrets = load_secrets(
            Some("g-key".to_string()),
            None,
            Path::new("/nonexistent/secrets.toml"),
        )
        .expect("load secrets");

        assert!(secrets.is_none());
        assert!(!Config::new(secrets).is_ready());
    }

    #[test]
    fn secrets_file_fills_in_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "GOOGLE_API_KEY = \"file-google\"").expect("write");
        writeln!(file, "TAVILY_API_KEY = \"file-tavily\"").expect("write");

        let secrets = load_secrets(None, Some("env-tavily".to_string()), file.path())
            .expect("load secrets")
            .expect("both keys present");

        // Environment wins over the file for keys present in both.
        assert_eq!(secrets.google_api_key, "file-google");
        assert_eq!(secrets.tavily_api_key, "env-tavily");
    }

    #[test]
    fn malformed_secrets_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "GOOGLE_API_KEY = [not toml").expect("write");

        let err = load_secrets(None, None, file.path());
        assert!(matches!(err, Err(ConfigError::SecretsFile(_, _))));
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let secrets = load_secrets(
            Some(String::new()),
            Some("t-key".to_string()),
            Path::new("/nonexistent/secrets.toml"),
        )
        .expect("load secrets");

        assert!(secrets.is_none());
    }
}
