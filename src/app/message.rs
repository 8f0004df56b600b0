// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::domain::handoff::HandoffRequest;
use crate::domain::{Color, Hardware, Material};
use crate::error::Error;
use crate::material::{TextureImage, TextureKey};
use crate::platform::ArFlowOutcome;
use crate::scene::SceneGraph;
use crate::ui::ar_popup;
use crate::ui::controls;
use crate::ui::notifications;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Controls(controls::Message),
    ArPopup(ar_popup::Message),
    Notification(notifications::NotificationMessage),
    /// The `.glb` model finished loading.
    ModelLoaded(Result<SceneGraph, Error>),
    /// A texture read finished. `generation` is the load generation that
    /// requested it.
    TextureLoaded {
        generation: u64,
        key: TextureKey,
        result: Result<TextureImage, Error>,
    },
    /// The "View in your space" sequence finished.
    ArFlowFinished(ArFlowOutcome),
    /// Periodic tick for notification auto-dismiss.
    Tick(Instant),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default, Clone)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `uk`, `en-US`).
    pub lang: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `BACKPACK_CONFIGURATOR_CONFIG_DIR`.
    pub config_dir: Option<String>,
    /// Optional assets directory override (model and textures).
    /// Takes precedence over `BACKPACK_CONFIGURATOR_ASSETS_DIR`.
    pub assets_dir: Option<String>,
    /// User agent used to pick the AR presentation instead of the build target.
    pub user_agent: Option<String>,
    /// Configuration received through a hand-off link.
    pub handoff: Option<HandoffRequest>,
    pub material: Option<Material>,
    pub color: Option<Color>,
    pub hardware: Option<Hardware>,
}
