// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the viewer, the
//! controls and the AR popup.
//!
//! The `App` struct wires together the domains (configuration, scene,
//! textures, device integration, localization) and translates messages into
//! side effects like model and texture loading or the AR activation flow.

pub mod cli;
pub mod config;
mod message;
pub mod paths;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::configurator::Configurator;
use crate::domain::{handoff, ConfigChange, Configuration};
use crate::i18n::I18n;
use crate::platform::{
    ArLauncher, CameraAccess, DeviceCamera, DeviceCapabilities, SystemProbe, UnsupportedLauncher,
    UserAgentProbe,
};
use crate::scene::glb;
use crate::ui::ar_popup::ArPopup;
use crate::ui::model_viewer::ViewerContent;
use crate::ui::notifications;
use config::Config;
use iced::{window, Element, Subscription, Task, Theme};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub const WINDOW_DEFAULT_WIDTH: u32 = 760;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 980;
pub const MIN_WINDOW_WIDTH: u32 = 480;
pub const MIN_WINDOW_HEIGHT: u32 = 640;

/// Where the backpack model stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Loading,
    Ready,
    Failed,
}

/// Device integration used by the AR popup.
#[derive(Debug, Clone)]
pub struct Devices {
    pub capabilities: Arc<dyn DeviceCapabilities>,
    pub camera: Arc<dyn CameraAccess>,
    pub launcher: Arc<dyn ArLauncher>,
}

impl Devices {
    /// Host devices, with the presentation taken from `user_agent` when given.
    pub fn detect(user_agent: Option<&str>) -> Self {
        let capabilities: Arc<dyn DeviceCapabilities> = match user_agent {
            Some(agent) => Arc::new(UserAgentProbe::new(agent)),
            None => Arc::new(SystemProbe),
        };
        Self {
            capabilities,
            camera: Arc::new(DeviceCamera::default()),
            launcher: Arc::new(UnsupportedLauncher),
        }
    }
}

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    configurator: Configurator,
    viewer: ViewerContent,
    model_status: ModelStatus,
    ar_popup: Option<ArPopup>,
    devices: Devices,
    assets_root: PathBuf,
    handoff_origin: String,
    /// Toast notification manager for user feedback.
    notifications: notifications::Manager,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("configuration", &self.configurator.configuration())
            .field("model_status", &self.model_status)
            .field("ar_popup", &self.ar_popup)
            .finish()
    }
}

/// Builds the window settings
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    paths::init_cli_overrides(flags.config_dir.clone(), flags.assets_dir.clone());

    // iced 0.14 boots through an `Fn`; the flags are consumed on the first call.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

/// Configuration shown at launch and whether the AR popup opens right away.
///
/// Field flags win over a hand-off link, which wins over the `[startup]`
/// section of the settings.
pub fn resolve_startup(config: &Config, flags: &Flags) -> (Configuration, bool) {
    let (mut configuration, open_ar) = match flags.handoff {
        Some(request) => (request.configuration, request.ar),
        None => (config.startup.configuration(), false),
    };

    let overrides = [
        flags.material.map(ConfigChange::Material),
        flags.color.map(ConfigChange::Color),
        flags.hardware.map(ConfigChange::Hardware),
    ];
    for change in overrides.into_iter().flatten() {
        configuration = configuration.with(change);
    }

    (configuration, open_ar)
}

impl App {
    /// Loads the settings, then builds the initial state and starts reading
    /// the model.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, config_warning) = config::load();
        let (mut app, task) = Self::with_config(&config, flags);

        if let Some(key) = config_warning {
            app.notifications
                .push(notifications::Notification::warning(&key));
        }

        (app, task)
    }

    fn with_config(config: &Config, flags: Flags) -> (Self, Task<Message>) {
        let devices = Devices::detect(flags.user_agent.as_deref());
        Self::with_devices(config, flags, devices)
    }

    fn with_devices(config: &Config, flags: Flags, devices: Devices) -> (Self, Task<Message>) {
        let i18n = I18n::new(flags.lang.clone(), config);
        let (configuration, open_ar) = resolve_startup(config, &flags);
        let assets_root =
            paths::get_assets_dir_with_override(None, config.assets.root.as_deref());

        tracing::info!(
            %configuration,
            assets = %assets_root.display(),
            "starting configurator"
        );

        let handoff_origin = config.handoff_origin().to_string();
        let ar_popup = open_ar.then(|| {
            let url = handoff::build(&handoff_origin, &configuration);
            ArPopup::open(devices.capabilities.as_ref(), &url)
        });

        let app = App {
            i18n,
            configurator: Configurator::new(
                configuration,
                config.hardware_mesh(),
                config.cache_capacity(),
            ),
            viewer: ViewerContent::default(),
            model_status: ModelStatus::Loading,
            ar_popup,
            devices,
            assets_root,
            handoff_origin,
            notifications: notifications::Manager::new(),
        };

        let model = paths::model_path(&app.assets_root);
        let task = Task::perform(glb::load_async(model), Message::ModelLoaded);

        (app, task)
    }

    fn title(&self) -> String {
        self.i18n.tr("window-title")
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }

    fn subscription(&self) -> Subscription<Message> {
        let event_sub = subscription::create_event_subscription(self.ar_popup.is_some());
        let tick_sub =
            subscription::create_tick_subscription(self.notifications.has_notifications());

        Subscription::batch([event_sub, tick_sub])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let mut ctx = update::UpdateContext {
            configurator: &mut self.configurator,
            viewer: &mut self.viewer,
            model_status: &mut self.model_status,
            ar_popup: &mut self.ar_popup,
            devices: &self.devices,
            assets_root: &self.assets_root,
            handoff_origin: &self.handoff_origin,
            notifications: &mut self.notifications,
        };

        match message {
            Message::Controls(controls_message) => {
                update::handle_controls_message(&mut ctx, controls_message)
            }
            Message::ArPopup(popup_message) => {
                update::handle_ar_popup_message(&mut ctx, popup_message)
            }
            Message::Notification(notification_message) => {
                self.notifications.handle_message(&notification_message);
                Task::none()
            }
            Message::ModelLoaded(result) => update::handle_model_loaded(&mut ctx, result),
            Message::TextureLoaded {
                generation,
                key,
                result,
            } => update::handle_texture_loaded(&mut ctx, generation, key, result),
            Message::ArFlowFinished(outcome) => update::handle_ar_flow_finished(&mut ctx, outcome),
            Message::Tick(_instant) => {
                self.notifications.tick();
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            configuration: self.configurator.configuration(),
            viewer: &self.viewer,
            model_status: self.model_status,
            ar_popup: self.ar_popup.as_ref(),
            handoff_origin: &self.handoff_origin,
            notifications: &self.notifications,
        })
    }
}
