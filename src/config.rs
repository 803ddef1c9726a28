use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:7860/detect";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 150;

#[derive(Debug, Deserialize, Default)]
struct ViewerConfigFile {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
    resize_debounce_ms: Option<u64>,
}

/// Viewer configuration, layered file < env < CLI flags.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub resize_debounce: Duration,
}

impl ViewerConfig {
    /// Load from the TOML file named by `BOXVIEW_CONFIG` (if set), then
    /// apply `BOXVIEW_*` env overrides, then validate.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("BOXVIEW_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ViewerConfigFile) -> Self {
        Self {
            endpoint: file
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            resize_debounce: Duration::from_millis(
                file.resize_debounce_ms
                    .unwrap_or(DEFAULT_RESIZE_DEBOUNCE_MS),
            ),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(endpoint) = std::env::var("BOXVIEW_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.endpoint = endpoint;
            }
        }
        if let Ok(secs) = std::env::var("BOXVIEW_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| anyhow!("BOXVIEW_TIMEOUT_SECS must be an integer number of seconds"))?;
            self.timeout = Duration::from_secs(secs);
        }
        if let Ok(ms) = std::env::var("BOXVIEW_RESIZE_DEBOUNCE_MS") {
            let ms: u64 = ms.parse().map_err(|_| {
                anyhow!("BOXVIEW_RESIZE_DEBOUNCE_MS must be an integer number of milliseconds")
            })?;
            self.resize_debounce = Duration::from_millis(ms);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.endpoint)
            .map_err(|e| anyhow!("invalid endpoint url '{}': {}", self.endpoint, e))?;
        if self.timeout.as_secs() == 0 {
            return Err(anyhow!("timeout must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::from_file(ViewerConfigFile::default())
    }
}

fn read_config_file(path: &Path) -> Result<ViewerConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = toml::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
