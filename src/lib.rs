// SPDX-License-Identifier: MPL-2.0
//! `backpack_configurator` is a 3D backpack configurator built with the Iced
//! GUI framework.
//!
//! A material, a color and a hardware finish are picked from fixed option
//! sets; every change re-synthesizes the PBR materials of the loaded model.
//! The current configuration can be handed to a mobile device through a
//! link and viewed there in AR.

#![doc(html_root_url = "https://docs.rs/backpack_configurator/0.1.0")]

pub mod app;
pub mod configurator;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod material;
pub mod platform;
pub mod scene;
pub mod ui;

#[cfg(test)]
mod test_utils;
