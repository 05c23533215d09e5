//! Provisioning record and field validators.
//!
//! Every validator here is platform-independent and works on already-trimmed
//! operator answers, so the whole rule set can be tested without a terminal.
//!
//! # Example
//!
//! ```
//! use dawon_provision::config::{parse_port, validate_ipv4, DEFAULT_MQTT_PORT, PortField};
//!
//! assert_eq!(parse_port("0", PortField::Mqtt).unwrap(), DEFAULT_MQTT_PORT);
//! assert!(validate_ipv4("192.168.43.1").is_ok());
//! assert!(validate_ipv4("192.168.01.1").is_err());
//! ```

use super::model::DeviceModel;
use std::fmt;
use zeroize::Zeroize;

/// Minimum WiFi password length (WPA2).
pub const MIN_PASSWORD_LEN: usize = 8;

/// MQTT broker port used when the operator enters 0.
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Device port used when the operator enters 0.
pub const DEFAULT_DEVICE_PORT: u16 = 5000;

/// Device address used when the operator leaves the IP prompt empty.
///
/// This is the address the plug uses on its own setup access point.
pub const DEFAULT_DEVICE_IP: &str = "192.168.43.1";

/// MQTT password suggested to the operator. Not enforced.
pub const RECOMMENDED_MQTT_PASSWORD: &str = "1234";

/// A complete, validated provisioning record.
///
/// Passwords are zeroed when the record is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    /// WiFi network SSID.
    pub wifi_name: String,
    /// WiFi password (at least [`MIN_PASSWORD_LEN`] characters).
    pub wifi_password: String,
    /// MQTT broker hostname or IPv4 literal.
    pub mqtt_host: String,
    /// MQTT broker port.
    pub mqtt_port: u16,
    /// MQTT key sent to the device. May be empty.
    pub mqtt_password: String,
    /// Model name as the operator entered it (or the default).
    pub device_model_name: String,
    /// Model resolved from `device_model_name`.
    pub device_model: DeviceModel,
    /// Device IPv4 address in dotted-quad form.
    pub device_ip: String,
    /// Device TCP port.
    pub device_port: u16,
}

impl ProvisionConfig {
    /// Re-check every field rule against this record.
    #[cfg(test)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_wifi_name(&self.wifi_name)?;
        validate_wifi_password(&self.wifi_password)?;
        validate_mqtt_host(&self.mqtt_host)?;
        check_port_range(i64::from(self.mqtt_port), PortField::Mqtt)?;

        let model = DeviceModel::resolve(&self.device_model_name)?;
        if model.protocol_id() != self.device_model.protocol_id() {
            return Err(ConfigError::UnsupportedModel(
                self.device_model_name.clone(),
            ));
        }

        validate_ipv4(&self.device_ip)?;
        check_port_range(i64::from(self.device_port), PortField::Device)?;
        Ok(())
    }

    /// Protocol identifier sent in the payload `model` field.
    pub fn device_protocol_model(&self) -> &'static str {
        self.device_model.protocol_id()
    }

    /// `ip:port` of the device's setup socket.
    pub fn device_address(&self) -> String {
        format!("{}:{}", self.device_ip, self.device_port)
    }
}

impl Drop for ProvisionConfig {
    fn drop(&mut self) {
        self.wifi_password.zeroize();
        self.mqtt_password.zeroize();
    }
}

impl fmt::Debug for ProvisionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionConfig")
            .field("wifi_name", &self.wifi_name)
            .field("wifi_password", &"****")
            .field("mqtt_host", &self.mqtt_host)
            .field("mqtt_port", &self.mqtt_port)
            .field("mqtt_password", &"****")
            .field("device_model_name", &self.device_model_name)
            .field("device_model", &self.device_model)
            .field("device_ip", &self.device_ip)
            .field("device_port", &self.device_port)
            .finish()
    }
}

/// Which of the two port fields a port error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortField {
    /// MQTT broker port.
    Mqtt,
    /// Device setup port.
    Device,
}

impl PortField {
    /// Port substituted when the operator enters 0 (or nothing).
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Mqtt => DEFAULT_MQTT_PORT,
            Self::Device => DEFAULT_DEVICE_PORT,
        }
    }
}

impl fmt::Display for PortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mqtt => write!(f, "MQTT port"),
            Self::Device => write!(f, "device port"),
        }
    }
}

/// Reject an empty WiFi network name.
pub fn validate_wifi_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::WifiNameEmpty);
    }
    Ok(())
}

/// Reject WiFi passwords shorter than [`MIN_PASSWORD_LEN`] characters.
pub fn validate_wifi_password(password: &str) -> Result<(), ConfigError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(ConfigError::WifiPasswordTooShort {
            len,
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Reject an empty MQTT host.
pub fn validate_mqtt_host(host: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(ConfigError::MqttHostEmpty);
    }
    Ok(())
}

/// Parse a port answer.
///
/// `0` (or an empty answer) selects the field's default. Anything that is not
/// a decimal integer, or lands outside 1..=65535, is rejected.
pub fn parse_port(input: &str, field: PortField) -> Result<u16, ConfigError> {
    let value: i64 = if input.is_empty() {
        0
    } else {
        input.parse().map_err(|_| ConfigError::InvalidPort {
            field,
            input: input.to_string(),
        })?
    };

    if value == 0 {
        return Ok(field.default_port());
    }
    check_port_range(value, field)
}

fn check_port_range(value: i64, field: PortField) -> Result<u16, ConfigError> {
    match u16::try_from(value) {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ConfigError::PortOutOfRange { field, value }),
    }
}

/// Resolve the device IP answer, substituting [`DEFAULT_DEVICE_IP`] when empty.
pub fn resolve_device_ip(input: &str) -> Result<String, ConfigError> {
    let ip = if input.is_empty() {
        DEFAULT_DEVICE_IP
    } else {
        input
    };
    validate_ipv4(ip)?;
    Ok(ip.to_string())
}

/// Validate a dotted-quad IPv4 address.
///
/// Exactly four segments, each a decimal number 0..=255, with no leading zero
/// unless the segment is `0` itself.
pub fn validate_ipv4(address: &str) -> Result<(), ConfigError> {
    if is_valid_ipv4(address) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIpv4(address.to_string()))
    }
}

/// Boolean form of [`validate_ipv4`].
pub fn is_valid_ipv4(address: &str) -> bool {
    let segments: Vec<&str> = address.split('.').collect();
    segments.len() == 4 && segments.iter().all(|s| is_valid_octet(s))
}

fn is_valid_octet(segment: &str) -> bool {
    if segment.is_empty() || segment.len() > 3 {
        return false;
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if segment.len() > 1 && segment.starts_with('0') {
        return false;
    }
    segment.parse::<u16>().map(|v| v <= 255).unwrap_or(false)
}

/// Field validation errors. Each one aborts the current collection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// WiFi network name is empty.
    WifiNameEmpty,
    /// WiFi password is too short.
    WifiPasswordTooShort { len: usize, min: usize },
    /// MQTT host is empty.
    MqttHostEmpty,
    /// Port answer is not an integer.
    InvalidPort { field: PortField, input: String },
    /// Port outside 1..=65535.
    PortOutOfRange { field: PortField, value: i64 },
    /// Model name not in the supported set.
    UnsupportedModel(String),
    /// Device address is not a dotted-quad IPv4 address.
    InvalidIpv4(String),
    /// Answer for the named field is not valid UTF-8 text.
    NotUtf8 { field: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WifiNameEmpty => write!(f, "WiFi name cannot be empty"),
            Self::WifiPasswordTooShort { len, min } => {
                write!(
                    f,
                    "WiFi password too short: {} characters (min {})",
                    len, min
                )
            }
            Self::MqttHostEmpty => write!(f, "MQTT server address cannot be empty"),
            Self::InvalidPort { field, input } => {
                write!(f, "{} is not a number: {:?}", field, input)
            }
            Self::PortOutOfRange { field, value } => {
                write!(f, "{} out of range: {} (must be 1-65535)", field, value)
            }
            Self::UnsupportedModel(name) => write!(
                f,
                "unsupported device model: {:?} (supported: {})",
                name,
                DeviceModel::supported_list()
            ),
            Self::InvalidIpv4(addr) => {
                write!(f, "device IP is not a valid IPv4 address: {:?}", addr)
            }
            Self::NotUtf8 { field } => write!(f, "{} is not valid UTF-8 text", field),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ProvisionConfig {
        ProvisionConfig {
            wifi_name: "HomeNet".to_string(),
            wifi_password: "supersecret".to_string(),
            mqtt_host: "10.0.0.5".to_string(),
            mqtt_port: 1883,
            mqtt_password: "1234".to_string(),
            device_model_name: "B540-WF".to_string(),
            device_model: DeviceModel::B540Wf,
            device_ip: "192.168.43.1".to_string(),
            device_port: 5000,
        }
    }

    // ==================== ProvisionConfig Tests ====================

    #[test]
    fn test_valid_config() {
        let config = sample_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.device_protocol_model(), "B5X");
        assert_eq!(config.device_address(), "192.168.43.1:5000");
    }

    #[test]
    fn test_config_zero_port_invalid() {
        let mut config = sample_config();
        config.device_port = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PortOutOfRange {
                field: PortField::Device,
                value: 0
            })
        );
    }

    #[test]
    fn test_config_model_mismatch_invalid() {
        let mut config = sample_config();
        config.device_model_name = "B400-W".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedModel(_))
        ));
    }

    #[test]
    fn test_debug_masks_passwords() {
        let debug = format!("{:?}", sample_config());
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("HomeNet"));
    }

    // ==================== Text Field Tests ====================

    #[test]
    fn test_wifi_name() {
        assert_eq!(validate_wifi_name(""), Err(ConfigError::WifiNameEmpty));
        assert!(validate_wifi_name("x").is_ok());
    }

    #[test]
    fn test_wifi_password_length_boundary() {
        for len in 0..MIN_PASSWORD_LEN {
            let password = "p".repeat(len);
            assert_eq!(
                validate_wifi_password(&password),
                Err(ConfigError::WifiPasswordTooShort {
                    len,
                    min: MIN_PASSWORD_LEN
                })
            );
        }
        for len in MIN_PASSWORD_LEN..MIN_PASSWORD_LEN + 4 {
            assert!(validate_wifi_password(&"p".repeat(len)).is_ok());
        }
    }

    #[test]
    fn test_wifi_password_counts_characters() {
        // 8 characters, 16 bytes
        assert!(validate_wifi_password("비밀번호비밀번호").is_ok());
        // 4 characters, 12 bytes
        assert!(validate_wifi_password("비밀번호").is_err());
    }

    #[test]
    fn test_mqtt_host() {
        assert_eq!(validate_mqtt_host(""), Err(ConfigError::MqttHostEmpty));
        assert!(validate_mqtt_host("broker.local").is_ok());
    }

    // ==================== Port Tests ====================

    #[test]
    fn test_port_zero_uses_default() {
        assert_eq!(parse_port("0", PortField::Mqtt), Ok(1883));
        assert_eq!(parse_port("0", PortField::Device), Ok(5000));
        assert_eq!(parse_port("", PortField::Mqtt), Ok(1883));
        assert_eq!(parse_port("", PortField::Device), Ok(5000));
    }

    #[test]
    fn test_port_in_range() {
        assert_eq!(parse_port("1", PortField::Mqtt), Ok(1));
        assert_eq!(parse_port("8883", PortField::Mqtt), Ok(8883));
        assert_eq!(parse_port("65535", PortField::Device), Ok(65535));
    }

    #[test]
    fn test_port_out_of_range() {
        assert_eq!(
            parse_port("65536", PortField::Mqtt),
            Err(ConfigError::PortOutOfRange {
                field: PortField::Mqtt,
                value: 65536
            })
        );
        assert_eq!(
            parse_port("-1", PortField::Device),
            Err(ConfigError::PortOutOfRange {
                field: PortField::Device,
                value: -1
            })
        );
    }

    #[test]
    fn test_port_not_a_number() {
        for input in ["abc", "1883x", "1.5", "99999999999999999999"] {
            assert_eq!(
                parse_port(input, PortField::Mqtt),
                Err(ConfigError::InvalidPort {
                    field: PortField::Mqtt,
                    input: input.to_string()
                })
            );
        }
    }

    // ==================== IPv4 Tests ====================

    #[test]
    fn test_ipv4_accepted() {
        for addr in ["192.168.43.1", "0.0.0.0", "255.255.255.255", "10.0.0.5"] {
            assert!(is_valid_ipv4(addr), "{}", addr);
        }
    }

    #[test]
    fn test_ipv4_rejected() {
        for addr in [
            "",
            "192.168.1",
            "256.1.1.1",
            "192.168.01.1",
            "1.2.3.4.5",
            "1..2.3",
            "a.b.c.d",
            "+1.2.3.4",
            "1.2.3.4.",
            "00.1.2.3",
            "1000.1.1.1",
        ] {
            assert!(!is_valid_ipv4(addr), "{:?}", addr);
        }
    }

    #[test]
    fn test_resolve_device_ip() {
        assert_eq!(resolve_device_ip("").unwrap(), DEFAULT_DEVICE_IP);
        assert_eq!(resolve_device_ip("10.1.2.3").unwrap(), "10.1.2.3");
        assert_eq!(
            resolve_device_ip("10.1.2"),
            Err(ConfigError::InvalidIpv4("10.1.2".to_string()))
        );
    }

    // ==================== Error Display Tests ====================

    #[test]
    fn test_error_messages_name_the_field() {
        assert!(ConfigError::WifiNameEmpty.to_string().contains("WiFi name"));
        assert!(ConfigError::MqttHostEmpty.to_string().contains("MQTT"));
        assert!(ConfigError::PortOutOfRange {
            field: PortField::Device,
            value: 70000
        }
        .to_string()
        .contains("device port"));
        assert!(ConfigError::UnsupportedModel("X999".into())
            .to_string()
            .contains("X999"));
        assert_eq!(
            ConfigError::NotUtf8 { field: "WiFi name" }.to_string(),
            "WiFi name is not valid UTF-8 text"
        );
    }
}
