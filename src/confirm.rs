//! Confirmation gate.
//!
//! Shows the collected record and insists on an explicit yes or no before
//! anything is sent to the device.

use crate::config::ProvisionConfig;
use crate::console::{is_undecodable, Console, LineSource};
use log::debug;
use std::fmt;
use std::io::{self, Write};

/// Human-readable rendering of every record field, one per line.
pub struct Summary<'a>(pub &'a ProvisionConfig);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;
        writeln!(f, "WiFi name: {}", config.wifi_name)?;
        writeln!(f, "WiFi password: {}", config.wifi_password)?;
        writeln!(f, "MQTT server: {}", config.mqtt_host)?;
        writeln!(f, "MQTT port: {}", config.mqtt_port)?;
        writeln!(f, "MQTT password: {}", config.mqtt_password)?;
        writeln!(
            f,
            "Device model: {} ({})",
            config.device_model_name,
            config.device_protocol_model()
        )?;
        writeln!(f, "Device IP: {}", config.device_ip)?;
        write!(f, "Device port: {}", config.device_port)
    }
}

/// Interpret a confirmation answer. Only `Y`, `y`, `N` and `n` count.
pub fn parse_answer(answer: &str) -> Option<bool> {
    match answer {
        "Y" | "y" => Some(true),
        "N" | "n" => Some(false),
        _ => None,
    }
}

/// Show the summary and wait for y/n.
///
/// Returns `Some(true)` to transmit, `Some(false)` to collect again, and
/// `None` if the input stream closed first.
pub fn confirm<L: LineSource, W: Write>(
    console: &mut Console<L, W>,
    config: &ProvisionConfig,
) -> io::Result<Option<bool>> {
    console.section("Confirm settings")?;
    console.say(Summary(config))?;
    console.blank()?;

    let mut answer = decoded(console.ask("Are these settings correct? (y/n)"))?;
    loop {
        let Some(line) = answer else {
            debug!("Input closed during confirmation");
            return Ok(None);
        };
        if let Some(proceed) = parse_answer(&line) {
            debug!("Confirmation answer: {}", proceed);
            return Ok(Some(proceed));
        }
        console.say("Please answer y or n.")?;
        answer = decoded(console.read_answer())?;
    }
}

/// Undecodable lines count as unrecognized answers.
fn decoded(read: io::Result<Option<String>>) -> io::Result<Option<String>> {
    match read {
        Err(e) if is_undecodable(&e) => Ok(Some(String::new())),
        other => other,
    }
}
