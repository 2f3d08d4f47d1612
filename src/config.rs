// src/config.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{ClassifyError, Result};

pub const HOSTED_ENDPOINT: &str = "https://mangovate-server.onrender.com/predicted/";
pub const LOCAL_ENDPOINT: &str = "http://127.0.0.1:8000/predicted/";

/// The two deployments the form has been pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Hosted,
    Local,
}

impl Variant {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hosted" => Ok(Variant::Hosted),
            "local" => Ok(Variant::Local),
            other => Err(ClassifyError::Config(format!(
                "Unknown variant '{}', expected 'hosted' or 'local'",
                other
            ))),
        }
    }
}

/// Where to send images and how long to wait for an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub endpoint_url: String,
    pub timeout_ms: u64,
}

impl ClassifierConfig {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Hosted => Self {
                endpoint_url: HOSTED_ENDPOINT.to_string(),
                timeout_ms: 50_000,
            },
            Variant::Local => Self {
                endpoint_url: LOCAL_ENDPOINT.to_string(),
                timeout_ms: 10_000,
            },
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.endpoint_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClassifyError::Config(format!(
                "Endpoint URL must be http(s), got '{}'",
                self.endpoint_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ClassifyError::Config("Timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::for_variant(Variant::Hosted)
    }
}

/// High-level application configuration for the form server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub classifier: ClassifierConfig,
    pub bind_host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub session_idle_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            bind_host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 10 * 1024 * 1024,
            session_idle_secs: 3600,
        }
    }
}

/// On-disk shape; every key is optional and overrides the defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    variant: Option<Variant>,
    endpoint_url: Option<String>,
    timeout_ms: Option<u64>,
    bind_host: Option<String>,
    port: Option<u16>,
    max_upload_bytes: Option<usize>,
    session_idle_secs: Option<u64>,
}

impl AppConfig {
    /// Load defaults, then the TOML file (if any), then environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = AppConfig::default();

        if let Some(path) = config_file_path() {
            log::info!("Loading configuration from {}", path.display());
            config.apply_toml(&std::fs::read_to_string(&path)?)?;
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        config.classifier.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config = AppConfig::default();
        config.apply_toml(contents)?;
        config.classifier.validate()?;
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    fn apply_toml(&mut self, contents: &str) -> Result<()> {
        let file: FileConfig = toml::from_str(contents)?;

        if let Some(variant) = file.variant {
            self.classifier = ClassifierConfig::for_variant(variant);
        }
        if let Some(url) = file.endpoint_url {
            self.classifier.endpoint_url = url;
        }
        if let Some(timeout_ms) = file.timeout_ms {
            self.classifier.timeout_ms = timeout_ms;
        }
        if let Some(host) = file.bind_host {
            self.bind_host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(max) = file.max_upload_bytes {
            self.max_upload_bytes = max;
        }
        if let Some(secs) = file.session_idle_secs {
            self.session_idle_secs = secs;
        }
        Ok(())
    }

    /// `lookup` is `std::env::var` in production; tests pass a closure over a map.
    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(variant) = lookup("MANGOVATE_VARIANT") {
            self.classifier = ClassifierConfig::for_variant(Variant::parse(&variant)?);
        }
        if let Some(url) = lookup("MANGOVATE_ENDPOINT_URL") {
            self.classifier.endpoint_url = url.trim().to_string();
        }
        if let Some(timeout) = lookup("MANGOVATE_TIMEOUT_MS") {
            self.classifier.timeout_ms = parse_number("MANGOVATE_TIMEOUT_MS", &timeout)?;
        }
        if let Some(host) = lookup("MANGOVATE_BIND") {
            self.bind_host = host.trim().to_string();
        }
        if let Some(port) = lookup("MANGOVATE_PORT") {
            self.port = parse_number("MANGOVATE_PORT", &port)?;
        }
        if let Some(max) = lookup("MANGOVATE_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = parse_number("MANGOVATE_MAX_UPLOAD_BYTES", &max)?;
        }
        if let Some(secs) = lookup("MANGOVATE_SESSION_IDLE_SECS") {
            self.session_idle_secs = parse_number("MANGOVATE_SESSION_IDLE_SECS", &secs)?;
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ClassifyError::Config(format!("{} must be a number, got '{}'", key, value)))
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("MANGOVATE_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("mangovate").join("config.toml"))
        .filter(|path| path.exists())
}
