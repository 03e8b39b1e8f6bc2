use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{Cli, ProxyType};
use crate::error::{CheckerError, CheckerResult};
use crate::installer::{EXECUTABLE_NAME, INSTALL_DIR};
use crate::output::DEFAULT_OUTPUT_FILE;
use crate::prober::DEFAULT_TIMEOUT;

/// Persistent settings for proxychecker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub probe: ProbeConfig,
    pub output: OutputConfig,
    pub install: InstallConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub file: PathBuf,
    pub proxy_type: ProxyType,
    pub color: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InstallConfig {
    pub directory: PathBuf,
    pub executable_name: String,
    pub overwrite: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            proxy_type: ProxyType::Socks5,
            color: true,
        }
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(INSTALL_DIR),
            executable_name: EXECUTABLE_NAME.to_string(),
            overwrite: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe: ProbeConfig::default(),
            output: OutputConfig::default(),
            install: InstallConfig::default(),
        }
    }
}

impl Config {
    /// Load the config file given on the command line, or the one in the
    /// standard config directory. Only an explicit path has to exist.
    pub fn load(explicit: Option<&Path>) -> CheckerResult<Self> {
        let config = match explicit {
            Some(path) => Self::load_from(path)?,
            None => {
                let path = Self::get_config_path();
                if path.exists() {
                    Self::load_from(&path)?
                } else {
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> CheckerResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CheckerError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            CheckerError::Config(format!("cannot parse {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Get the path to the config file
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("proxychecker");
        path.push("config.json");
        path
    }

    /// Validate configuration settings
    pub fn validate(&self) -> CheckerResult<()> {
        if self.probe.timeout_ms == 0 {
            return Err(CheckerError::Config(
                "probe.timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.output.file.as_os_str().is_empty() {
            return Err(CheckerError::Config("output.file must not be empty".to_string()));
        }

        if self.install.executable_name.is_empty() || self.install.executable_name.contains('/') {
            return Err(CheckerError::Config(
                "install.executable_name must be a plain file name".to_string(),
            ));
        }

        Ok(())
    }
}

/// Effective settings of one run: the config file with command-line
/// overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub timeout: Duration,
    pub output_file: PathBuf,
    pub proxy_type: ProxyType,
    pub color: bool,
    pub install_dir: PathBuf,
    pub executable_name: String,
    pub overwrite: bool,
}

impl Settings {
    pub fn resolve(config: Config, cli: &Cli) -> CheckerResult<Self> {
        let timeout_ms = cli.timeout.unwrap_or(config.probe.timeout_ms);
        if timeout_ms == 0 {
            return Err(CheckerError::Config("timeout must be greater than 0".to_string()));
        }

        Ok(Self {
            timeout: Duration::from_millis(timeout_ms),
            output_file: cli.output.clone().unwrap_or(config.output.file),
            proxy_type: cli.proxy_type.unwrap_or(config.output.proxy_type),
            color: config.output.color && !cli.no_color,
            install_dir: config.install.directory,
            executable_name: config.install.executable_name,
            overwrite: config.install.overwrite || cli.force,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.probe.timeout_ms, 2000);
        assert_eq!(config.output.file, PathBuf::from("working_proxies.txt"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "output": { "proxy_type": "http" } }"#).unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.output.proxy_type, ProxyType::Http);
        assert_eq!(config.output.file, PathBuf::from("working_proxies.txt"));
        assert_eq!(config.probe, ProbeConfig::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.probe.timeout_ms = 0;
        assert!(matches!(config.validate(), Err(CheckerError::Config(_))));

        let mut config = Config::default();
        config.install.executable_name = "bin/proxychecker".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(dir.path().join("nope.json").as_path()));
        assert!(matches!(result, Err(CheckerError::Config(_))));
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = Config::default();
        config.output.color = true;
        config.probe.timeout_ms = 5000;

        let cli = Cli::try_parse_from([
            "proxychecker",
            "list.txt",
            "-o",
            "chains.txt",
            "--timeout",
            "750",
            "--no-color",
        ])
        .unwrap();
        let settings = Settings::resolve(config.clone(), &cli).unwrap();

        assert_eq!(settings.timeout, Duration::from_millis(750));
        assert_eq!(settings.output_file, PathBuf::from("chains.txt"));
        assert_eq!(settings.proxy_type, ProxyType::Socks5);
        assert!(!settings.color);
        assert!(!settings.overwrite);

        let cli = Cli::try_parse_from(["proxychecker", "-i", "--force"]).unwrap();
        let settings = Settings::resolve(config, &cli).unwrap();
        assert_eq!(settings.timeout, Duration::from_millis(5000));
        assert!(settings.overwrite);
    }

    #[test]
    fn test_zero_timeout_flag_rejected() {
        let cli = Cli::try_parse_from(["proxychecker", "list.txt", "-t", "0"]).unwrap();
        assert!(Settings::resolve(Config::default(), &cli).is_err());
    }
}
