use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::geo::{RangeModel, DEFAULT_RANGE_FACTOR};
use crate::kml::{DescriptorStore, LinkDescriptor, LookAtDescriptor};

const APP_DIR: &str = "globe-sync";

/// Smallest interval that still shows as non-zero with six decimals.
const MIN_REFRESH_INTERVAL_S: f64 = 0.001;
const MAX_REFRESH_INTERVAL_S: f64 = 86_400.0;
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Everything the bridge needs, built once at startup and handed to each
/// component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    pub viewer: ViewerConfig,
    pub web: WebConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub save_directory: PathBuf,
    pub view_file_name: String,
    pub link_file_name: String,
    /// Poll interval written into the link descriptor, in seconds.
    pub refresh_interval_s: f64,
    pub range_factor: f64,
    pub folder_name: String,
    pub link_name: String,
    pub fly_to_view: bool,
    pub home: LookAtDescriptor,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            view_file_name: "CurrentView.kml".to_string(),
            link_file_name: "NetworkLink.kml".to_string(),
            refresh_interval_s: DEFAULT_REFRESH_INTERVAL.as_secs_f64(),
            range_factor: DEFAULT_RANGE_FACTOR,
            folder_name: "Map to Globe Sync".to_string(),
            link_name: "Map View".to_string(),
            fly_to_view: true,
            home: LookAtDescriptor::home(),
        }
    }
}

fn default_save_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Open the link descriptor in the globe viewer on activation.
    pub launch: bool,
    /// Program to run with the link path as its last argument. Falls back
    /// to the platform's file opener.
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            launch: true,
            command: None,
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
    pub api_keys: Vec<ApiKey>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            api_keys: Vec::new(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub name: String,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sync = &self.sync;
        if !(MIN_REFRESH_INTERVAL_S..=MAX_REFRESH_INTERVAL_S).contains(&sync.refresh_interval_s) {
            return Err(ConfigError::Invalid(format!(
                "sync.refresh_interval_s must be between {} and {} seconds, got {}",
                MIN_REFRESH_INTERVAL_S, MAX_REFRESH_INTERVAL_S, sync.refresh_interval_s
            )));
        }
        if !sync.range_factor.is_finite() || sync.range_factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "sync.range_factor must be positive, got {}",
                sync.range_factor
            )));
        }
        if sync.view_file_name.trim().is_empty() || sync.link_file_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "descriptor file names must not be empty".to_string(),
            ));
        }
        if sync.view_file_name == sync.link_file_name {
            return Err(ConfigError::Invalid(
                "view and link descriptors must use different file names".to_string(),
            ));
        }
        Ok(())
    }

    /// Always within the validated bounds, even for a config that skipped
    /// [`validate`](Self::validate).
    pub fn refresh_interval(&self) -> Duration {
        let secs = self
            .sync
            .refresh_interval_s
            .clamp(MIN_REFRESH_INTERVAL_S, MAX_REFRESH_INTERVAL_S);
        Duration::try_from_secs_f64(secs).unwrap_or(DEFAULT_REFRESH_INTERVAL)
    }

    pub fn set_refresh_interval(&mut self, interval: Duration) {
        self.sync.refresh_interval_s = interval.as_secs_f64();
    }

    pub fn range_model(&self) -> RangeModel {
        RangeModel::new(self.sync.range_factor)
    }

    pub fn store(&self) -> DescriptorStore {
        DescriptorStore::new(
            self.sync.save_directory.clone(),
            self.sync.view_file_name.clone(),
            self.sync.link_file_name.clone(),
        )
    }

    pub fn link_descriptor(&self) -> LinkDescriptor {
        LinkDescriptor {
            folder_name: self.sync.folder_name.clone(),
            link_name: self.sync.link_name.clone(),
            href: self.sync.view_file_name.clone(),
            refresh_interval: self.refresh_interval(),
            fly_to_view: self.sync.fly_to_view,
        }
    }

    pub fn find_api_key(&self, key: &str) -> Option<&ApiKey> {
        self.web.api_keys.iter().find(|k| k.key == key)
    }
}
