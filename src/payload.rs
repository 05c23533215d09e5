//! Provisioning wire payload.
//!
//! The plug firmware accepts a single JSON object with a fixed key set and key
//! order:
//!
//! ```text
//! {"server_addr":"..","server_port":"..","ssl_support":"no","ssid":"..","pass":"..",
//!  "mqtt_key":"..","company":"DAWONDNS","model":"..","topic":"dwd"}
//! ```
//!
//! The legacy tooling substitutes values into that template without escaping,
//! and it is not known whether the firmware parses escaped strings. The
//! [`WireEncoding::Verbatim`] encoding reproduces the legacy bytes exactly and
//! is the default. [`WireEncoding::Escaped`] runs the same structure through
//! `serde_json`. Both are byte-identical unless a value contains `"`, `\` or a
//! control character.

use crate::config::ProvisionConfig;
use serde::Serialize;

/// Constant `ssl_support` value.
pub const SSL_SUPPORT: &str = "no";

/// Constant `company` value.
pub const COMPANY: &str = "DAWONDNS";

/// Constant `topic` value.
pub const TOPIC: &str = "dwd";

/// How string values are written into the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireEncoding {
    /// Insert values as-is, matching the legacy tool byte for byte.
    #[default]
    Verbatim,
    /// Escape values as JSON strings.
    Escaped,
}

/// Payload fields in wire order.
#[derive(Debug, Serialize)]
pub struct Payload<'a> {
    server_addr: &'a str,
    server_port: String,
    ssl_support: &'static str,
    ssid: &'a str,
    pass: &'a str,
    mqtt_key: &'a str,
    company: &'static str,
    model: &'static str,
    topic: &'static str,
}

impl<'a> Payload<'a> {
    /// Build the payload for a confirmed record.
    pub fn from_config(config: &'a ProvisionConfig) -> Self {
        Self {
            server_addr: &config.mqtt_host,
            server_port: config.mqtt_port.to_string(),
            ssl_support: SSL_SUPPORT,
            ssid: &config.wifi_name,
            pass: &config.wifi_password,
            mqtt_key: &config.mqtt_password,
            company: COMPANY,
            model: config.device_protocol_model(),
            topic: TOPIC,
        }
    }

    /// Render with the requested encoding.
    pub fn encode(&self, encoding: WireEncoding) -> Result<String, serde_json::Error> {
        match encoding {
            WireEncoding::Verbatim => Ok(self.to_verbatim()),
            WireEncoding::Escaped => serde_json::to_string(self),
        }
    }

    /// Render by direct substitution, without escaping.
    pub fn to_verbatim(&self) -> String {
        format!(
            "{{\"server_addr\":\"{}\",\"server_port\":\"{}\",\"ssl_support\":\"{}\",\
             \"ssid\":\"{}\",\"pass\":\"{}\",\"mqtt_key\":\"{}\",\"company\":\"{}\",\
             \"model\":\"{}\",\"topic\":\"{}\"}}",
            self.server_addr,
            self.server_port,
            self.ssl_support,
            self.ssid,
            self.pass,
            self.mqtt_key,
            self.company,
            self.model,
            self.topic
        )
    }

    /// Names of operator-supplied fields whose values would break the
    /// verbatim encoding.
    pub fn unsafe_fields(&self) -> Vec<&'static str> {
        [
            ("server_addr", self.server_addr),
            ("ssid", self.ssid),
            ("pass", self.pass),
            ("mqtt_key", self.mqtt_key),
        ]
        .into_iter()
        .filter(|(_, value)| needs_escaping(value))
        .map(|(name, _)| name)
        .collect()
    }
}

fn needs_escaping(value: &str) -> bool {
    value.chars().any(|c| c == '"' || c == '\\' || c.is_control())
}

/// Check that `text` parses as a JSON object.
pub fn is_well_formed(text: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(text),
        Ok(serde_json::Value::Object(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceModel;

    const EXPECTED: &str = "{\"server_addr\":\"10.0.0.5\",\"server_port\":\"1883\",\
        \"ssl_support\":\"no\",\"ssid\":\"HomeNet\",\"pass\":\"supersecret\",\
        \"mqtt_key\":\"1234\",\"company\":\"DAWONDNS\",\"model\":\"B5X\",\"topic\":\"dwd\"}";

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

    #[test]
    fn test_verbatim_matches_legacy_format() {
        let config = sample_config();
        let payload = Payload::from_config(&config);
        assert_eq!(payload.to_verbatim(), EXPECTED);
        assert!(is_well_formed(&payload.to_verbatim()));
    }

    #[test]
    fn test_escaped_identical_for_plain_values() {
        let config = sample_config();
        let payload = Payload::from_config(&config);
        assert_eq!(payload.encode(WireEncoding::Escaped).unwrap(), EXPECTED);
        assert_eq!(payload.encode(WireEncoding::Verbatim).unwrap(), EXPECTED);
    }

    #[test]
    fn test_b400_model_id() {
        let mut config = sample_config();
        config.device_model_name = "B400-W".to_string();
        config.device_model = DeviceModel::B400W;
        config.mqtt_port = 8883;
        let text = Payload::from_config(&config).to_verbatim();
        assert!(text.contains("\"model\":\"B400_SW\""));
        assert!(text.contains("\"server_port\":\"8883\""));
    }

    #[test]
    fn test_quote_in_password() {
        let mut config = sample_config();
        config.wifi_password = "pa\"ssword".to_string();
        let payload = Payload::from_config(&config);

        let verbatim = payload.to_verbatim();
        assert!(verbatim.contains("\"pass\":\"pa\"ssword\""));
        assert!(!is_well_formed(&verbatim));
        assert_eq!(payload.unsafe_fields(), vec!["pass"]);

        let escaped = payload.encode(WireEncoding::Escaped).unwrap();
        assert!(escaped.contains("\"pass\":\"pa\\\"ssword\""));
        assert!(is_well_formed(&escaped));
    }

    #[test]
    fn test_backslash_in_ssid() {
        let mut config = sample_config();
        config.wifi_name = "Home\\Net".to_string();
        let payload = Payload::from_config(&config);
        assert_eq!(payload.unsafe_fields(), vec!["ssid"]);
    }

    #[test]
    fn test_plain_values_are_safe() {
        let config = sample_config();
        assert!(Payload::from_config(&config).unsafe_fields().is_empty());
    }

    #[test]
    fn test_is_well_formed_rejects_non_objects() {
        assert!(!is_well_formed("[]"));
        assert!(!is_well_formed("\"x\""));
        assert!(!is_well_formed(""));
    }
}
