// SPDX-License-Identifier: MPL-2.0
//! AR hand-off URL.
//!
//! Desktop users hand the current configuration to a phone through a link
//! of the form `<origin>?ar=true&material=<m>&color=<c>&hardware=<h>`.
//! [`parse`] reads the same link back so a receiving instance can start
//! with the encoded configuration.

use super::configuration::{Color, ConfigOption, Configuration, Hardware, Material};
use crate::error::{Error, Result};

/// A decoded hand-off link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandoffRequest {
    /// Whether the sender asked for the AR view to open directly.
    pub ar: bool,
    pub configuration: Configuration,
}

/// Builds the hand-off URL for a configuration.
#[must_use]
pub fn build(origin: &str, config: &Configuration) -> String {
    format!(
        "{origin}?ar=true&material={}&color={}&hardware={}",
        config.material.wire_name(),
        config.color.wire_name(),
        config.hardware.wire_name(),
    )
}

/// Parses a hand-off URL.
///
/// Missing fields take their default option, unknown query keys are
/// ignored, and unknown option values are rejected.
pub fn parse(url: &str) -> Result<HandoffRequest> {
    let (_, query) = url
        .split_once('?')
        .ok_or_else(|| Error::Handoff(format!("missing query string: {url}")))?;
    let query = query.split('#').next().unwrap_or_default();

    let mut ar = false;
    let mut material = None;
    let mut color = None;
    let mut hardware = None;

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "ar" => ar = value.eq_ignore_ascii_case("true") || value == "1",
            "material" => material = Some(Material::parse(value)?),
            "color" => color = Some(Color::parse(value)?),
            "hardware" => hardware = Some(Hardware::parse(value)?),
            _ => {}
        }
    }

    Ok(HandoffRequest {
        ar,
        configuration: Configuration::from_options(material, color, hardware),
    })
}
