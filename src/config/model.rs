//! Supported smart-plug models and their firmware protocol identifiers.

use super::ConfigError;
use std::fmt;

/// Model name assumed when the operator leaves the model prompt empty.
pub const DEFAULT_MODEL_NAME: &str = "B540-WF";

/// A smart-plug model the provisioning payload is known to work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceModel {
    /// Smart Plug B530-WF.
    B530Wf,
    /// Smart Plug B540-WF.
    B540Wf,
    /// Smart Solar Power Generation Plug B400-W.
    B400W,
}

/// All supported models, in the order they are listed to the operator.
pub const SUPPORTED_MODELS: &[DeviceModel] =
    &[DeviceModel::B530Wf, DeviceModel::B540Wf, DeviceModel::B400W];

impl DeviceModel {
    /// Human-readable model name as printed on the device.
    pub fn name(&self) -> &'static str {
        match self {
            Self::B530Wf => "B530-WF",
            Self::B540Wf => "B540-WF",
            Self::B400W => "B400-W",
        }
    }

    /// Identifier the device firmware expects in the `model` payload field.
    pub fn protocol_id(&self) -> &'static str {
        match self {
            Self::B530Wf | Self::B540Wf => "B5X",
            Self::B400W => "B400_SW",
        }
    }

    /// Resolve a model answer, substituting [`DEFAULT_MODEL_NAME`] when empty.
    pub fn resolve(input: &str) -> Result<Self, ConfigError> {
        if input.is_empty() {
            DEFAULT_MODEL_NAME.parse()
        } else {
            input.parse()
        }
    }

    /// Slash-separated list of supported model names, for prompts.
    pub fn supported_list() -> String {
        SUPPORTED_MODELS
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl std::str::FromStr for DeviceModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED_MODELS
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnsupportedModel(s.to_string()))
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
