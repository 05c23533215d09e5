//! Prompt/validate collector.
//!
//! Walks the operator through every provisioning field in a fixed order. The
//! first invalid answer ends the attempt: the remaining fields are not
//! prompted and the caller is expected to start over from the first field.

use crate::config::{
    parse_port, resolve_device_ip, validate_mqtt_host, validate_wifi_name,
    validate_wifi_password, ConfigError, DeviceModel, PortField, ProvisionConfig,
    DEFAULT_DEVICE_IP, DEFAULT_DEVICE_PORT, DEFAULT_MODEL_NAME, DEFAULT_MQTT_PORT,
    MIN_PASSWORD_LEN, RECOMMENDED_MQTT_PASSWORD,
};
use crate::console::{is_undecodable, Console, LineSource};
use log::debug;
use std::io::{self, Write};
use zeroize::Zeroizing;

/// Result of one collection attempt.
#[derive(Debug)]
pub enum Collected {
    /// Every field was entered and passed validation.
    Complete(ProvisionConfig),
    /// A field failed validation; collection must restart.
    Rejected(ConfigError),
    /// The operator closed the input stream.
    EndOfInput,
}

/// Why an attempt stopped early.
enum Interrupt {
    Rejected(ConfigError),
    EndOfInput,
    Io(io::Error),
}

impl From<ConfigError> for Interrupt {
    fn from(e: ConfigError) -> Self {
        Self::Rejected(e)
    }
}

impl From<io::Error> for Interrupt {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Run one collection attempt.
///
/// Validation failures are reported to the operator and returned as
/// [`Collected::Rejected`]. Only failures of the console itself are errors.
pub fn collect<L: LineSource, W: Write>(console: &mut Console<L, W>) -> io::Result<Collected> {
    match collect_fields(console) {
        Ok(config) => {
            debug!("Collected {:?}", config);
            Ok(Collected::Complete(config))
        }
        Err(Interrupt::Rejected(e)) => {
            debug!("Collection attempt rejected: {}", e);
            console.say(format!("[error] - {}", e))?;
            console.say("Please enter the settings again.")?;
            console.blank()?;
            Ok(Collected::Rejected(e))
        }
        Err(Interrupt::EndOfInput) => {
            debug!("Input closed during collection");
            Ok(Collected::EndOfInput)
        }
        Err(Interrupt::Io(e)) => Err(e),
    }
}

/// Ask for one field. `field` names it in the diagnostic for undecodable input.
fn answer<L: LineSource, W: Write>(
    console: &mut Console<L, W>,
    field: &'static str,
    prompt: &str,
) -> Result<String, Interrupt> {
    match console.ask(prompt) {
        Ok(Some(line)) => Ok(line),
        Ok(None) => Err(Interrupt::EndOfInput),
        Err(e) if is_undecodable(&e) => {
            Err(Interrupt::Rejected(ConfigError::NotUtf8 { field }))
        }
        Err(e) => Err(Interrupt::Io(e)),
    }
}

fn collect_fields<L: LineSource, W: Write>(
    console: &mut Console<L, W>,
) -> Result<ProvisionConfig, Interrupt> {
    console.section("WiFi settings")?;
    let wifi_name = answer(console, "WiFi name", "Enter the WiFi network name.")?;
    validate_wifi_name(&wifi_name)?;

    // Wiped on drop if a later field rejects the attempt
    let mut wifi_password = Zeroizing::new(answer(
        console,
        "WiFi password",
        &format!(
            "Enter the WiFi password. (at least {} characters)",
            MIN_PASSWORD_LEN
        ),
    )?);
    validate_wifi_password(&wifi_password)?;
    console.blank()?;

    console.section("MQTT settings")?;
    let mqtt_host = answer(
        console,
        "MQTT server address",
        "Enter the MQTT server address. (IP or domain)",
    )?;
    validate_mqtt_host(&mqtt_host)?;

    let mqtt_port = answer(
        console,
        "MQTT port",
        &format!(
            "Enter the MQTT server port. (0 for default: {})",
            DEFAULT_MQTT_PORT
        ),
    )?;
    let mqtt_port = parse_port(&mqtt_port, PortField::Mqtt)?;

    let mut mqtt_password = Zeroizing::new(answer(
        console,
        "MQTT password",
        &format!(
            "Enter the MQTT server password. ({} recommended)",
            RECOMMENDED_MQTT_PASSWORD
        ),
    )?);
    console.blank()?;

    console.section("Device settings")?;
    let model_answer = answer(
        console,
        "device model",
        &format!(
            "Enter the device model name. (default: {}, supported: {})",
            DEFAULT_MODEL_NAME,
            DeviceModel::supported_list()
        ),
    )?;
    let device_model = DeviceModel::resolve(&model_answer)?;
    let device_model_name = if model_answer.is_empty() {
        DEFAULT_MODEL_NAME.to_string()
    } else {
        model_answer
    };

    let ip_answer = answer(
        console,
        "device IP",
        &format!(
            "Enter the device IPv4 address. (default: {})",
            DEFAULT_DEVICE_IP
        ),
    )?;
    let device_ip = resolve_device_ip(&ip_answer)?;

    let device_port = answer(
        console,
        "device port",
        &format!(
            "Enter the device port. (0 for default: {})",
            DEFAULT_DEVICE_PORT
        ),
    )?;
    let device_port = parse_port(&device_port, PortField::Device)?;

    Ok(ProvisionConfig {
        wifi_name,
        wifi_password: std::mem::take(&mut *wifi_password),
        mqtt_host,
        mqtt_port,
        mqtt_password: std::mem::take(&mut *mqtt_password),
        device_model_name,
        device_model,
        device_ip,
        device_port,
    })
}
