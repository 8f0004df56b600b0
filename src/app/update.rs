// SPDX-License-Identifier: MPL-2.0
//! Message handlers for the application.
//!
//! Each handler receives an [`UpdateContext`] borrowing the parts of the
//! application state it may touch and returns the follow-up [`Task`].

use super::{notifications, Devices, Message, ModelStatus};
use crate::configurator::{Configurator, Update};
use crate::domain::handoff;
use crate::error::Error;
use crate::material::{loader, LoadOutcome, TextureImage, TextureKey};
use crate::platform::{self, ArFlowOutcome};
use crate::scene::SceneGraph;
use crate::ui::ar_popup::{self, ArPopup};
use crate::ui::controls;
use crate::ui::model_viewer::ViewerContent;
use iced::Task;
use std::path::Path;

/// Key of the warning shown for textures of the current configuration that
/// could not be read. Cleared when the configuration changes.
const TEXTURE_WARNING_KEY: &str = "warning-texture-load";

/// Mutable view over the application state used by the handlers.
pub struct UpdateContext<'a> {
    pub configurator: &'a mut Configurator,
    pub viewer: &'a mut ViewerContent,
    pub model_status: &'a mut ModelStatus,
    pub ar_popup: &'a mut Option<ArPopup>,
    pub devices: &'a Devices,
    pub assets_root: &'a Path,
    pub handoff_origin: &'a str,
    pub notifications: &'a mut notifications::Manager,
}

impl UpdateContext<'_> {
    /// Pushes the latest materials to the viewer and starts the texture
    /// reads of a synthesis pass.
    fn apply_update(&mut self, update: Option<Update>) -> Task<Message> {
        self.viewer.sync(self.configurator);
        match update {
            Some(update) => {
                tracing::debug!(
                    pass = update.report.pass,
                    loads = update.loads.len(),
                    "materials synthesized"
                );
                load_textures(self.assets_root, update)
            }
            None => Task::none(),
        }
    }
}

fn load_textures(assets_root: &Path, update: Update) -> Task<Message> {
    Task::batch(update.loads.into_iter().map(|request| {
        let path = request.key.path(assets_root);
        Task::perform(loader::load_texture(path), move |result| {
            Message::TextureLoaded {
                generation: request.generation,
                key: request.key,
                result,
            }
        })
    }))
}

pub fn handle_model_loaded(
    ctx: &mut UpdateContext<'_>,
    result: Result<SceneGraph, Error>,
) -> Task<Message> {
    match result {
        Ok(scene) => {
            *ctx.model_status = ModelStatus::Ready;
            let update = ctx.configurator.set_scene(scene);
            ctx.apply_update(Some(update))
        }
        Err(error) => {
            tracing::error!(%error, "backpack model unavailable, keeping placeholder");
            *ctx.model_status = ModelStatus::Failed;
            ctx.notifications
                .push(notifications::Notification::from_error(&error));
            Task::none()
        }
    }
}

pub fn handle_texture_loaded(
    ctx: &mut UpdateContext<'_>,
    generation: u64,
    key: TextureKey,
    result: Result<TextureImage, Error>,
) -> Task<Message> {
    match ctx.configurator.texture_loaded(generation, key, result) {
        LoadOutcome::Stored { .. } => {
            ctx.viewer.sync(ctx.configurator);
        }
        LoadOutcome::Failed {
            error,
            report: true,
        } => {
            ctx.notifications.push_unique(
                notifications::Notification::from_error(&error)
                    .with_arg("texture", key.file_name()),
            );
        }
        LoadOutcome::Failed { report: false, .. } => {}
    }
    Task::none()
}

pub fn handle_controls_message(
    ctx: &mut UpdateContext<'_>,
    message: controls::Message,
) -> Task<Message> {
    match message {
        controls::Message::Changed(change) => {
            let update = ctx.configurator.apply(change);
            if update.is_some() {
                ctx.notifications.dismiss_key(TEXTURE_WARNING_KEY);
            }
            ctx.apply_update(update)
        }
        controls::Message::ViewInAr => {
            let url = handoff::build(ctx.handoff_origin, &ctx.configurator.configuration());
            *ctx.ar_popup = Some(ArPopup::open(ctx.devices.capabilities.as_ref(), &url));
            Task::none()
        }
    }
}

pub fn handle_ar_popup_message(
    ctx: &mut UpdateContext<'_>,
    message: ar_popup::Message,
) -> Task<Message> {
    match message {
        ar_popup::Message::Close => {
            *ctx.ar_popup = None;
            Task::none()
        }
        ar_popup::Message::CopyLink => {
            let url = handoff::build(ctx.handoff_origin, &ctx.configurator.configuration());
            tracing::debug!(%url, "copying hand-off link");
            ctx.notifications
                .push(notifications::Notification::success("ar-link-copied"));
            iced::clipboard::write(url)
        }
        ar_popup::Message::ViewInSpace => {
            let Some(popup) = ctx.ar_popup.as_mut() else {
                return Task::none();
            };
            if !popup.begin_launch() {
                return Task::none();
            }

            let devices = ctx.devices.clone();
            let model = super::paths::model_path(ctx.assets_root);
            Task::perform(
                platform::ar_flow(devices.capabilities, devices.camera, devices.launcher, model),
                Message::ArFlowFinished,
            )
        }
    }
}

pub fn handle_ar_flow_finished(
    ctx: &mut UpdateContext<'_>,
    outcome: ArFlowOutcome,
) -> Task<Message> {
    if let Some(popup) = ctx.ar_popup.as_mut() {
        popup.finish_launch(&outcome);
    }

    match &outcome {
        ArFlowOutcome::Activated => {
            ctx.notifications
                .push(notifications::Notification::success("ar-session-started"));
        }
        ArFlowOutcome::PermissionDenied(error) | ArFlowOutcome::LaunchFailed(error) => {
            ctx.notifications
                .push(notifications::Notification::from_error(error));
        }
        ArFlowOutcome::Unsupported => {
            if let Some(key) = outcome.alert_key() {
                ctx.notifications
                    .push(notifications::Notification::info(key));
            }
        }
        ArFlowOutcome::Skipped => {}
    }
    Task::none()
}
