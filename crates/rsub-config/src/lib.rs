//! Configuration management for rsub.
//!
//! Parses `rsub.toml` configuration files with serde. A file is read only
//! when its path is given explicitly; without one every setting comes from
//! the command line. CLI settings are applied during load via
//! [`CliSettings`] and take precedence.
//!
//! ```toml
//! [source]
//! urls = ["https://example.com/feed.xml"]
//!
//! [convert]
//! search = "http://"
//! replace = "https://"
//!
//! [output]
//! file = "feed.xml"
//!
//! [pipeline]
//! on_load_error = "continue"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `source.urls`
//! - `source.user_agent`
//! - `output.file`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// Only non-empty / non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Replace configured source URLs when non-empty.
    pub urls: Vec<String>,
    /// Override search literal.
    pub search: Option<String>,
    /// Override replacement literal.
    pub replace: Option<String>,
    /// Override output file.
    pub out_file: Option<PathBuf>,
    /// Override load failure handling.
    pub on_load_error: Option<OnLoadError>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documents to fetch.
    pub source: SourceConfig,
    /// Replacement rule.
    pub convert: ConvertConfig,
    /// Output configuration (path is a relative string from TOML).
    output: OutputConfigRaw,
    /// Pipeline behaviour.
    pub pipeline: PipelineConfig,

    /// Resolved output file; `None` means standard output.
    #[serde(skip)]
    pub out_file: Option<PathBuf>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Source configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URLs fetched in order.
    pub urls: Vec<String>,
    /// User-Agent header for requests.
    pub user_agent: Option<String>,
}

/// Literal replacement rule. Both sides default to empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub search: String,
    pub replace: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OutputConfigRaw {
    file: Option<String>,
}

/// Pipeline configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// What to do once loading fails.
    pub on_load_error: OnLoadError,
}

/// Handling of a failed load stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnLoadError {
    /// Convert and print whatever was loaded.
    #[default]
    Continue,
    /// Skip convert and print.
    Abort,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`source.urls`").
        field: String,
        /// Error message (e.g., "${`FEED_HOST`} not set").
        message: String,
    },
    /// Neither the command line nor the config file named a URL.
    #[error("need to specify at least one -url option")]
    NoSources,
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise starts
    /// from defaults; no file is looked up implicitly, so a missing `-url`
    /// cannot be filled in by a stray `rsub.toml`.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if !settings.urls.is_empty() {
            self.source.urls.clone_from(&settings.urls);
        }
        if let Some(search) = &settings.search {
            self.convert.search.clone_from(search);
        }
        if let Some(replace) = &settings.replace {
            self.convert.replace.clone_from(replace);
        }
        if let Some(out_file) = &settings.out_file {
            self.out_file = Some(out_file.clone());
        }
        if let Some(on_load_error) = settings.on_load_error {
            self.pipeline.on_load_error = on_load_error;
        }
    }

    /// Get the source URLs, failing when there are none.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoSources` if the URL list is empty.
    pub fn require_sources(&self) -> Result<&[String], ConfigError> {
        if self.source.urls.is_empty() {
            return Err(ConfigError::NoSources);
        }
        Ok(&self.source.urls)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, url) in self.source.urls.iter().enumerate() {
            let field = format!("source.urls[{i}]");
            require_non_empty(url, &field)?;
            require_http_url(url, &field)?;
        }
        if let Some(ref user_agent) = self.source.user_agent {
            require_non_empty(user_agent, "source.user_agent")?;
        }
        if let Some(ref file) = self.output.file {
            require_non_empty(file, "output.file")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for url in &mut self.source.urls {
            *url = expand::expand_env(url, "source.urls")?;
        }
        if let Some(ref user_agent) = self.source.user_agent {
            self.source.user_agent = Some(expand::expand_env(user_agent, "source.user_agent")?);
        }
        if let Some(ref file) = self.output.file {
            self.output.file = Some(expand::expand_env(file, "output.file")?);
        }
        Ok(())
    }

    /// Resolve the output path relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.out_file = self
            .output
            .file
            .as_deref()
            .filter(|file| !file.is_empty())
            .map(|file| config_dir.join(file));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("rsub.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.source.urls.is_empty());
        assert!(config.source.user_agent.is_none());
        assert_eq!(config.convert.search, "");
        assert_eq!(config.convert.replace, "");
        assert!(config.out_file.is_none());
        assert_eq!(config.pipeline.on_load_error, OnLoadError::Continue);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.source.urls.is_empty());
        assert_eq!(config.pipeline.on_load_error, OnLoadError::Continue);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[source]
urls = ["https://a.example.com/rss", "http://b.example.com/atom"]
user_agent = "feed-bot/2"

[convert]
search = "http://"
replace = "https://"

[pipeline]
on_load_error = "abort"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.source.urls,
            vec!["https://a.example.com/rss", "http://b.example.com/atom"]
        );
        assert_eq!(config.source.user_agent.as_deref(), Some("feed-bot/2"));
        assert_eq!(config.convert.search, "http://");
        assert_eq!(config.convert.replace, "https://");
        assert_eq!(config.pipeline.on_load_error, OnLoadError::Abort);
    }

    #[test]
    fn test_parse_unknown_policy_fails() {
        let toml = r#"
[pipeline]
on_load_error = "retry"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
[source]
urls = ["https://example.com/feed"]

[output]
file = "out/feed.xml"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.source.urls, vec!["https://example.com/feed"]);
        assert_eq!(
            config.out_file,
            Some(temp_dir.path().join("out/feed.xml"))
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_absolute_output_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
[output]
file = "/tmp/rsub-feed.xml"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.out_file, Some(PathBuf::from("/tmp/rsub-feed.xml")));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/rsub.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_config(temp_dir.path(), "[source\nurls = 1");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_non_http_url() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
[source]
urls = ["https://ok.example.com", "ftp://example.com/feed"]
"#,
        );

        let err = Config::load(Some(&path), None).unwrap_err();
        match err {
            ConfigError::Validation(message) => {
                assert_eq!(
                    message,
                    "source.urls[1] must start with http:// or https://"
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_empty_user_agent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
[source]
user_agent = ""
"#,
        );

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_expands_env_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
[source]
urls = ["${RSUB_TEST_SURELY_UNSET_HOST:-https://fallback.example.com}/rss"]

[output]
file = "${RSUB_TEST_SURELY_UNSET_OUT:-feed.xml}"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(
            config.source.urls,
            vec!["https://fallback.example.com/rss"]
        );
        assert_eq!(config.out_file, Some(temp_dir.path().join("feed.xml")));
    }

    #[test]
    fn test_load_unset_env_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
[source]
user_agent = "${RSUB_TEST_SURELY_UNSET_AGENT}"
"#,
        );

        let err = Config::load(Some(&path), None).unwrap_err();
        match err {
            ConfigError::EnvVar { field, .. } => assert_eq!(field, "source.user_agent"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cli_settings_override_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
[source]
urls = ["https://file.example.com"]

[convert]
search = "a"
replace = "b"

[output]
file = "from-file.xml"
"#,
        );
        let settings = CliSettings {
            urls: vec!["https://cli.example.com".to_owned()],
            replace: Some("c".to_owned()),
            out_file: Some(PathBuf::from("from-cli.xml")),
            on_load_error: Some(OnLoadError::Abort),
            ..CliSettings::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.source.urls, vec!["https://cli.example.com"]);
        assert_eq!(config.convert.search, "a");
        assert_eq!(config.convert.replace, "c");
        assert_eq!(config.out_file, Some(PathBuf::from("from-cli.xml")));
        assert_eq!(config.pipeline.on_load_error, OnLoadError::Abort);
    }

    #[test]
    fn test_empty_cli_urls_keep_file_urls() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_config(
            temp_dir.path(),
            r#"
[source]
urls = ["https://file.example.com"]
"#,
        );

        let config = Config::load(Some(&path), Some(&CliSettings::default())).unwrap();

        assert_eq!(config.require_sources().unwrap(), ["https://file.example.com"]);
    }

    #[test]
    fn test_load_without_path_ignores_files() {
        // Config::load never looks at the working directory or its parents.
        let config = Config::load(None, None).unwrap();

        assert!(config.config_path.is_none());
        assert!(matches!(
            config.require_sources(),
            Err(ConfigError::NoSources)
        ));
    }

    #[test]
    fn test_require_sources_empty() {
        let config = Config::default();
        assert!(matches!(
            config.require_sources(),
            Err(ConfigError::NoSources)
        ));
    }

    #[test]
    fn test_cli_urls_are_not_scheme_validated() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            urls: vec!["example.com/feed".to_owned()],
            ..CliSettings::default()
        });

        assert_eq!(config.require_sources().unwrap(), ["example.com/feed"]);
    }
}
