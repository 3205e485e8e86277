//! `mimic.toml` project configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result, SourceContext};

/// Name of the configuration file looked up from the working directory upwards.
pub const CONFIG_FILE_NAME: &str = "mimic.toml";

/// Default import path of the mock runtime the generated code targets.
pub const DEFAULT_RUNTIME: &str = "github.com/petergtz/pegomock/v4";

/// Default name of the per-directory list of interfaces to watch.
pub const DEFAULT_LIST_FILE: &str = "interfaces_to_mock";

/// Default watch period.
pub const DEFAULT_INTERVAL_MS: u64 = 2000;

/// Root schema for mimic.toml. Every table is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub go: GoConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateConfig {
    /// Import path of the mock runtime package.
    #[serde(default = "default_runtime")]
    pub runtime: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_list_file")]
    pub list_file: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            list_file: default_list_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoConfig {
    /// The `go` executable.
    #[serde(default = "default_go_command")]
    pub command: String,
}

impl Default for GoConfig {
    fn default() -> Self {
        Self {
            command: default_go_command(),
        }
    }
}

fn default_runtime() -> String {
    DEFAULT_RUNTIME.to_string()
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

fn default_list_file() -> String {
    DEFAULT_LIST_FILE.to_string()
}

fn default_go_command() -> String {
    "go".to_string()
}

impl Config {
    /// Parse config content, using `filename` in diagnostics.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let source_ctx = SourceContext::new(content, filename);
        let config: Config = toml::from_str(content).map_err(|e| source_ctx.config_error(e))?;
        if config.watch.interval_ms == 0 {
            return Err(Error::invalid_arguments(format!(
                "{}: watch.interval_ms must be greater than zero",
                filename
            )));
        }
        Ok(config)
    }

    /// Open and parse a config file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Load the nearest `mimic.toml` at or above `dir`, or the defaults.
    pub fn discover(dir: &Path) -> Result<Self> {
        match find_config(dir) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::open(path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Find `mimic.toml` in `dir` or one of its ancestors.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|d| d.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::from_str_with_filename("", "mimic.toml").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.generate.runtime, DEFAULT_RUNTIME);
        assert_eq!(config.watch.interval_ms, 2000);
        assert_eq!(config.watch.list_file, "interfaces_to_mock");
        assert_eq!(config.go.command, "go");
    }

    #[test]
    fn test_partial_tables() {
        let content = r#"
[watch]
interval_ms = 500

[go]
command = "/usr/local/go/bin/go"
"#;
        let config = Config::from_str_with_filename(content, "mimic.toml").unwrap();
        assert_eq!(config.watch.interval_ms, 500);
        assert_eq!(config.watch.list_file, DEFAULT_LIST_FILE);
        assert_eq!(config.go.command, "/usr/local/go/bin/go");
        assert_eq!(config.generate.runtime, DEFAULT_RUNTIME);
    }

    #[test]
    fn test_unknown_key_has_span() {
        let content = "[watch]\nintervall = 3\n";
        let err = Config::from_str_with_filename(content, "mimic.toml").unwrap_err();
        match *err {
            Error::Config { span, .. } => assert!(span.is_some()),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = Config::from_str_with_filename("[watch]\ninterval_ms = 0\n", "mimic.toml")
            .unwrap_err();
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_discover_walks_ancestors() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[generate]\nruntime = \"example.com/runtime\"\n",
        )
        .unwrap();

        let config = Config::discover(&nested).unwrap();
        assert_eq!(config.generate.runtime, "example.com/runtime");
    }

    #[test]
    fn test_discover_without_file() {
        let temp = tempfile::tempdir().unwrap();
        assert!(find_config(temp.path()).is_none() || Config::discover(temp.path()).is_ok());
    }
}
