// SPDX-License-Identifier: MPL-2.0
//! Domain layer - the product configuration and the values derived from it.
//!
//! # Modules
//!
//! - [`configuration`]: The [`Configuration`](configuration::Configuration) value
//!   and its option enums ([`Material`](configuration::Material),
//!   [`Color`](configuration::Color), [`Hardware`](configuration::Hardware))
//! - [`palette`]: Fixed tint tables and the [`Rgb`](palette::Rgb) color type
//! - [`handoff`]: The AR hand-off URL (build and parse)

pub mod configuration;
pub mod handoff;
pub mod palette;

pub use configuration::{Color, ConfigChange, ConfigOption, Configuration, Hardware, Material};
pub use palette::Rgb;
