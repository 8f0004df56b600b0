// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! The page is a single centered column: title, 3D viewer and controls.
//! The AR popup and the toasts are layered on top of it.

use super::{Message, ModelStatus};
use crate::domain::{handoff, Configuration};
use crate::i18n::I18n;
use crate::ui::ar_popup::{self, ArPopup};
use crate::ui::controls;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::model_viewer::{self, ViewerContent};
use crate::ui::notifications::{Manager, Toast};
use crate::ui::styles;
use iced::widget::{center_x, container, scrollable, stack, Column, Stack, Text};
use iced::{alignment, Element, Font, Length};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub configuration: Configuration,
    pub viewer: &'a ViewerContent,
    pub model_status: ModelStatus,
    pub ar_popup: Option<&'a ArPopup>,
    pub handoff_origin: &'a str,
    pub notifications: &'a Manager,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let mut content = page(&ctx);

    if let Some(popup) = ctx.ar_popup {
        let popup_view = ar_popup::view(ar_popup::ViewContext {
            i18n: ctx.i18n,
            popup,
            configuration: ctx.configuration,
            handoff_url: handoff::build(ctx.handoff_origin, &ctx.configuration),
            viewer: ctx.viewer,
        })
        .map(Message::ArPopup);

        content = ar_popup::modal(
            content,
            popup_view,
            Message::ArPopup(ar_popup::Message::Close),
        );
    }

    let toasts = Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification);
    stack![content, toasts].into()
}

fn page<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let title = Text::new(ctx.i18n.tr("app-title"))
        .size(typography::TITLE_LG)
        .font(Font {
            weight: iced::font::Weight::Bold,
            ..Font::DEFAULT
        })
        .width(Length::Fill)
        .center();

    let viewer = container(viewer_panel(ctx.viewer, ctx.model_status, ctx.i18n))
        .width(Length::Fill)
        .height(Length::Fixed(sizing::VIEWER_HEIGHT))
        .style(styles::container::card);

    let controls = controls::view(controls::ViewContext {
        i18n: ctx.i18n,
        configuration: ctx.configuration,
    })
    .map(Message::Controls);

    let column = Column::new()
        .spacing(spacing::LG)
        .padding(spacing::XL)
        .max_width(sizing::CONTENT_MAX_WIDTH + 2.0 * spacing::XL)
        .push(title)
        .push(viewer)
        .push(controls);

    container(scrollable(center_x(column)).height(Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(styles::container::page)
        .into()
}

/// The viewer with a status caption while the model is missing.
fn viewer_panel<'a>(
    viewer: &'a ViewerContent,
    status: ModelStatus,
    i18n: &I18n,
) -> Element<'a, Message> {
    let caption_key = match status {
        ModelStatus::Loading => Some("viewer-loading"),
        ModelStatus::Failed => Some("viewer-load-failed"),
        ModelStatus::Ready => None,
    };

    let mut layers = Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(model_viewer::view(viewer));

    if let Some(key) = caption_key {
        layers = layers.push(
            container(
                Text::new(i18n.tr(key))
                    .size(typography::CAPTION)
                    .color(palette::GRAY_700),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(spacing::SM)
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Bottom),
        );
    }

    layers.into()
}
