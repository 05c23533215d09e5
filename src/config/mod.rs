//! Provisioning configuration.
//!
//! # Components
//!
//! - [`provision`] - the provisioning record, defaults and field validators
//! - [`model`] - supported plug models and their protocol identifiers

mod model;
mod provision;

pub use model::{DeviceModel, DEFAULT_MODEL_NAME, SUPPORTED_MODELS};
pub use provision::{
    is_valid_ipv4, parse_port, resolve_device_ip, validate_ipv4, validate_mqtt_host,
    validate_wifi_name, validate_wifi_password, ConfigError, PortField, ProvisionConfig,
    DEFAULT_DEVICE_IP, DEFAULT_DEVICE_PORT, DEFAULT_MQTT_PORT, MIN_PASSWORD_LEN,
    RECOMMENDED_MQTT_PASSWORD,
};
