use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// How `kestrel parse` renders a successfully built tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `Kind@start..end` line per node.
    #[default]
    Tree,
    /// Canonical source text.
    Source,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Diagnostics printed per file; the rest are summarized in a count.
    pub max_diagnostics: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            max_diagnostics: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub warnings: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { warnings: true }
    }
}

/// Settings read from `config.toml`. Every table and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub diagnostics: DiagnosticsConfig,
}

impl Config {
    /// Loads the file at `config_path`, falling back to defaults when it
    /// does not exist.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            log::debug!(
                "no config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        log::debug!("loaded config from {}", config_path.display());
        Ok(config)
    }

    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/kestrel");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expands `~` and environment variables in a user-supplied path,
    /// returning it unchanged when expansion fails.
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(err) => {
                log::warn!("could not expand {}: {err}", path.display());
                path.to_path_buf()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/kestrel/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.format, OutputFormat::Tree);
        assert_eq!(config.output.max_diagnostics, 50);
        assert!(config.diagnostics.warnings);
    }

    #[rstest]
    #[case::empty_file("", Config::default())]
    #[case::format_only(
        "[output]\nformat = \"source\"\n",
        Config {
            output: OutputConfig { format: OutputFormat::Source, max_diagnostics: 50 },
            ..Config::default()
        }
    )]
    #[case::warnings_off(
        "[diagnostics]\nwarnings = false\n",
        Config {
            diagnostics: DiagnosticsConfig { warnings: false },
            ..Config::default()
        }
    )]
    #[case::everything(
        "[output]\nformat = \"tree\"\nmax_diagnostics = 3\n[diagnostics]\nwarnings = false\n",
        Config {
            output: OutputConfig { format: OutputFormat::Tree, max_diagnostics: 3 },
            diagnostics: DiagnosticsConfig { warnings: false },
        }
    )]
    fn test_partial_files_fill_in_defaults(#[case] content: &str, #[case] expected: Config) {
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config, expected);
    }

    #[test]
    fn test_unknown_format_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[output]\nformat = \"xml\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from_path(&non_existent_config).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unreadable_path_is_a_read_error() {
        let temp_dir = TempDir::new().unwrap();

        // A directory exists but cannot be read as a file.
        let err = Config::load_from_path(temp_dir.path()).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigReadError { .. }));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            output: OutputConfig {
                format: OutputFormat::Source,
                max_diagnostics: 7,
            },
            diagnostics: DiagnosticsConfig { warnings: false },
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(Path::new("~/test/config.toml"));

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("test/config.toml"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("KESTREL_TEST_CONFIG_DIR", "/test/env/path");
        }

        let expanded = Config::expand_path(Path::new("$KESTREL_TEST_CONFIG_DIR/config.toml"));

        assert_eq!(expanded, PathBuf::from("/test/env/path/config.toml"));

        unsafe {
            env::remove_var("KESTREL_TEST_CONFIG_DIR");
        }
    }

    #[test]
    fn test_expand_path_with_unset_var_is_unchanged() {
        let path = Path::new("$KESTREL_TEST_SURELY_UNSET/config.toml");
        assert_eq!(Config::expand_path(path), path.to_path_buf());
    }
}
