use crate::RelayError;
use relay_image::ChannelOrder;
use relay_infer::{Device, HandConfig, PoseConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "RELAY_CONFIG";
pub const MODEL_DIR_ENV: &str = "RELAY_MODEL_DIR";
pub const LOG_DIR_ENV: &str = "RELAY_LOG_DIR";
pub const CHANNEL_ORDER_ENV: &str = "RELAY_CHANNEL_ORDER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Directory holding the `.onnx` landmark and palm models.
    pub model_dir: PathBuf,
    pub device: Device,
    /// Channel order of incoming frames.
    pub channel_order: ChannelOrder,
    /// Log to date-named files here instead of stderr.
    pub log_dir: Option<PathBuf>,
    pub pose: PoseConfig,
    pub hands: HandConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            device: Device::Cpu,
            channel_order: ChannelOrder::Rgb,
            log_dir: None,
            pose: PoseConfig::default(),
            hands: HandConfig::default(),
        }
    }
}

impl RelayConfig {
    pub fn from_file(path: &Path) -> Result<Self, RelayError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RelayError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text)
            .map_err(|e| RelayError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    /// Configuration from the process environment.
    pub fn load() -> Result<Self, RelayError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Configuration from `$RELAY_CONFIG` (if set) with variable overrides
    /// applied, reading variables through `lookup`.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelayError> {
        let mut config = match lookup(CONFIG_ENV).filter(|p| !p.is_empty()) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), RelayError> {
        if let Some(dir) = lookup(MODEL_DIR_ENV).filter(|v| !v.is_empty()) {
            self.model_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(LOG_DIR_ENV).filter(|v| !v.is_empty()) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(order) = lookup(CHANNEL_ORDER_ENV).filter(|v| !v.is_empty()) {
            self.channel_order = order
                .parse()
                .map_err(|e| RelayError::Config(format!("{CHANNEL_ORDER_ENV}: {e}")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        self.pose.validate()?;
        self.hands.validate()?;
        Ok(())
    }
}
