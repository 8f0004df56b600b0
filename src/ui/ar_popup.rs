// SPDX-License-Identifier: MPL-2.0
//! "View in AR" popup.
//!
//! The popup picks its branch once, when it opens: desktop-class devices get
//! a QR code of the hand-off link to scan with a phone, mobile devices get
//! an inline preview and the "View in your space" button. Clicking the
//! backdrop or the close button dismisses it.

use crate::domain::{ConfigOption, Configuration};
use crate::i18n::I18n;
use crate::platform::{ArFlowOutcome, DeviceCapabilities, Presentation};
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::model_viewer::{self, ViewerContent};
use crate::ui::styles;
use iced::widget::{
    button, center, container, mouse_area, opaque, qr_code, stack, Column, Row, Text,
};
use iced::{alignment, Element, Length};
use std::fmt;

/// Popup state while it is open.
pub struct ArPopup {
    presentation: Presentation,
    permission_granted: bool,
    launching: bool,
    /// Encoded once on open; the configuration cannot change behind the modal.
    qr_code: Option<qr_code::Data>,
}

impl fmt::Debug for ArPopup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArPopup")
            .field("presentation", &self.presentation)
            .field("permission_granted", &self.permission_granted)
            .field("launching", &self.launching)
            .field("qr_code", &self.qr_code.is_some())
            .finish()
    }
}

impl ArPopup {
    pub fn open(capabilities: &dyn DeviceCapabilities, handoff_url: &str) -> Self {
        let presentation = capabilities.presentation();
        tracing::debug!(?presentation, "opening AR popup");

        let qr_code = match presentation {
            Presentation::QrHandoff => match qr_code::Data::new(handoff_url) {
                Ok(data) => Some(data),
                Err(error) => {
                    tracing::warn!(?error, "hand-off link does not fit in a QR code");
                    None
                }
            },
            Presentation::InlineAr => None,
        };

        Self {
            presentation,
            permission_granted: false,
            launching: false,
            qr_code,
        }
    }

    pub fn qr_code(&self) -> Option<&qr_code::Data> {
        self.qr_code.as_ref()
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn permission_granted(&self) -> bool {
        self.permission_granted
    }

    /// Whether an AR request is running.
    pub fn is_launching(&self) -> bool {
        self.launching
    }

    /// Marks an AR request as started. Returns false if one is already
    /// running or the popup is not in its mobile branch.
    pub fn begin_launch(&mut self) -> bool {
        if self.launching || !self.presentation.is_mobile() {
            return false;
        }
        self.launching = true;
        true
    }

    pub fn finish_launch(&mut self, outcome: &ArFlowOutcome) {
        self.launching = false;
        if outcome.permission_granted() {
            self.permission_granted = true;
        }
    }

    /// The camera hint stays until permission has been granted once.
    pub fn shows_camera_instructions(&self) -> bool {
        self.presentation.is_mobile() && !self.permission_granted
    }
}

/// Contextual data needed to render the popup.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub popup: &'a ArPopup,
    pub configuration: Configuration,
    pub handoff_url: String,
    pub viewer: &'a ViewerContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Close,
    CopyLink,
    ViewInSpace,
}

fn config_line<'a, T: ConfigOption>(i18n: &I18n, key: &str, value: T) -> Element<'a, Message> {
    let label = i18n.tr(value.label_key());
    Text::new(i18n.tr_with_args(key, &[("value", label.as_str())]))
        .size(typography::BODY)
        .into()
}

fn configuration_info<'a>(i18n: &I18n, config: Configuration) -> Element<'a, Message> {
    let column = Column::new()
        .spacing(spacing::XXS)
        .push(Text::new(i18n.tr("ar-current-configuration")).size(typography::BODY))
        .push(config_line(i18n, "ar-config-material", config.material))
        .push(config_line(i18n, "ar-config-color", config.color))
        .push(config_line(i18n, "ar-config-hardware", config.hardware));

    container(column)
        .padding(spacing::MD)
        .width(Length::Fill)
        .style(styles::container::info_block)
        .into()
}

fn desktop_branch<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let popup: &'a ArPopup = ctx.popup;

    let url = Text::new(ctx.handoff_url.clone())
        .size(typography::CAPTION)
        .font(iced::Font::MONOSPACE);

    let copy = button(Text::new(ctx.i18n.tr("ar-copy-link")).size(typography::BODY))
        .on_press(Message::CopyLink)
        .padding([spacing::XS, spacing::MD])
        .style(styles::button::secondary);

    let instructions = if popup.qr_code().is_some() {
        "ar-qr-instructions"
    } else {
        "ar-handoff-instructions"
    };

    let mut column = Column::new()
        .spacing(spacing::SM)
        .align_x(alignment::Horizontal::Center);
    if let Some(data) = popup.qr_code() {
        column = column.push(qr_code(data));
    }

    column
        .push(
            container(url)
                .padding(spacing::SM)
                .width(Length::Fill)
                .style(styles::container::info_block),
        )
        .push(copy)
        .push(
            Text::new(ctx.i18n.tr(instructions))
                .size(typography::BODY)
                .center(),
        )
        .into()
}

fn mobile_branch<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let preview = container(model_viewer::view(ctx.viewer))
        .width(Length::Fill)
        .height(Length::Fixed(sizing::POPUP_VIEWER_HEIGHT))
        .style(styles::container::card);

    let launch = button(
        Text::new(ctx.i18n.tr("ar-view-in-space"))
            .size(typography::BODY_LG)
            .width(Length::Fill)
            .center(),
    )
    .on_press_maybe((!ctx.popup.is_launching()).then_some(Message::ViewInSpace))
    .padding([spacing::SM, spacing::LG])
    .width(Length::Fill)
    .style(styles::button::primary);

    let mut column = Column::new().spacing(spacing::SM).push(preview).push(launch);
    if ctx.popup.shows_camera_instructions() {
        column = column.push(
            Text::new(ctx.i18n.tr("ar-camera-instructions"))
                .size(typography::BODY)
                .center(),
        );
    }
    column.into()
}

/// The popup card.
pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let close = button(
        Text::new("×")
            .size(typography::TITLE_MD)
            .center(),
    )
    .on_press(Message::Close)
    .width(Length::Fixed(sizing::CLOSE_BUTTON))
    .height(Length::Fixed(sizing::CLOSE_BUTTON))
    .padding(0)
    .style(styles::button::ghost);

    let header = Row::new()
        .align_y(alignment::Vertical::Center)
        .push(
            Text::new(ctx.i18n.tr("ar-popup-title"))
                .size(typography::TITLE_MD)
                .width(Length::Fill),
        )
        .push(close);

    let branch = match ctx.popup.presentation() {
        Presentation::QrHandoff => desktop_branch(&ctx),
        Presentation::InlineAr => mobile_branch(&ctx),
    };

    let content = Column::new()
        .spacing(spacing::MD)
        .push(header)
        .push(configuration_info(ctx.i18n, ctx.configuration))
        .push(branch);

    container(content)
        .width(Length::Fixed(sizing::POPUP_WIDTH))
        .padding(spacing::XL)
        .style(styles::container::card)
        .into()
}

/// Layers `popup` over `base` on a dimmed backdrop that emits `on_close`
/// when clicked.
pub fn modal<'a, M>(base: Element<'a, M>, popup: Element<'a, M>, on_close: M) -> Element<'a, M>
where
    M: Clone + 'a,
{
    stack![
        base,
        opaque(
            mouse_area(center(opaque(popup)).style(styles::container::backdrop))
                .on_press(on_close)
        )
    ]
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::Config;
    use crate::error::Error;
    use crate::platform::UserAgentProbe;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";
    const LINUX: &str = "Mozilla/5.0 (X11; Linux x86_64)";
    const URL: &str = "http://localhost:3000?ar=true&material=denim&color=brown&hardware=silver";

    fn open(agent: &str) -> ArPopup {
        ArPopup::open(&UserAgentProbe::new(agent), URL)
    }

    #[test]
    fn branch_is_fixed_when_opened() {
        let desktop = open(LINUX);
        assert_eq!(desktop.presentation(), Presentation::QrHandoff);
        assert!(!desktop.shows_camera_instructions());

        let mobile = open(IPHONE);
        assert_eq!(mobile.presentation(), Presentation::InlineAr);
        assert!(mobile.shows_camera_instructions());
    }

    #[test]
    fn only_desktop_branch_encodes_qr_code() {
        assert!(open(LINUX).qr_code().is_some());
        assert!(open(IPHONE).qr_code().is_none());
    }

    #[test]
    fn oversized_link_falls_back_to_text() {
        let url = format!("http://localhost:3000?{}", "x".repeat(8000));
        let popup = ArPopup::open(&UserAgentProbe::new(LINUX), &url);
        assert_eq!(popup.presentation(), Presentation::QrHandoff);
        assert!(popup.qr_code().is_none());
    }

    #[test]
    fn desktop_popup_never_launches() {
        let mut popup = open(LINUX);
        assert!(!popup.begin_launch());
    }

    #[test]
    fn only_one_launch_at_a_time() {
        let mut popup = open(IPHONE);
        assert!(popup.begin_launch());
        assert!(!popup.begin_launch());
        popup.finish_launch(&ArFlowOutcome::Unsupported);
        assert!(popup.begin_launch());
    }

    #[test]
    fn denial_keeps_instructions_and_grant_hides_them() {
        let mut popup = open(IPHONE);
        popup.begin_launch();
        popup.finish_launch(&ArFlowOutcome::PermissionDenied(Error::Permission(
            "denied".into(),
        )));
        assert!(popup.shows_camera_instructions());

        popup.begin_launch();
        popup.finish_launch(&ArFlowOutcome::LaunchFailed(Error::ArUnsupported));
        assert!(popup.permission_granted());
        assert!(!popup.shows_camera_instructions());
    }

    #[test]
    fn both_branches_render() {
        let i18n = I18n::new(Some("en-US".to_string()), &Config::default());
        let viewer = ViewerContent::default();
        for agent in [LINUX, IPHONE] {
            let popup = open(agent);
            let _element = view(ViewContext {
                i18n: &i18n,
                popup: &popup,
                configuration: Configuration::default(),
                handoff_url: URL.to_string(),
                viewer: &viewer,
            });
        }
    }
}
