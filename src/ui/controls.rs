// SPDX-License-Identifier: MPL-2.0
//! Configuration controls: one pick list per option and the AR button.

use crate::domain::{Color, ConfigChange, ConfigOption, Configuration, Hardware, Material};
use crate::i18n::I18n;
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::styles;
use iced::widget::{button, container, pick_list, Column, Text};
use iced::{Element, Font, Length};
use std::fmt;

/// Contextual data needed to render the controls.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub configuration: Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Changed(ConfigChange),
    ViewInAr,
}

/// Option value paired with its translated label for `pick_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    pub value: T,
    label: String,
}

impl<T: ConfigOption> Choice<T> {
    fn new(value: T, i18n: &I18n) -> Self {
        Self {
            value,
            label: i18n.tr(value.label_key()),
        }
    }

    /// Every option of `T`, labelled, in display order.
    pub fn all(i18n: &I18n) -> Vec<Self> {
        T::ALL.iter().map(|&value| Self::new(value, i18n)).collect()
    }
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn field<'a, T>(
    i18n: &I18n,
    label_key: &str,
    selected: T,
    on_select: fn(T) -> ConfigChange,
) -> Element<'a, Message>
where
    T: ConfigOption + fmt::Debug,
{
    let choices = Choice::<T>::all(i18n);
    let current = choices.iter().find(|c| c.value == selected).cloned();

    let label = Text::new(i18n.tr(label_key))
        .size(typography::BODY_LG)
        .font(Font {
            weight: iced::font::Weight::Bold,
            ..Font::DEFAULT
        });
    let picker = pick_list(choices, current, move |choice: Choice<T>| {
        Message::Changed(on_select(choice.value))
    })
    .padding(spacing::XS)
    .text_size(typography::BODY_LG)
    .width(Length::Fill);

    Column::new()
        .spacing(spacing::XS)
        .push(label)
        .push(picker)
        .into()
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let config = ctx.configuration;

    let ar_button = button(
        Text::new(ctx.i18n.tr("controls-view-in-ar"))
            .size(typography::BODY_LG)
            .width(Length::Fill)
            .center(),
    )
    .on_press(Message::ViewInAr)
    .padding([spacing::SM, spacing::LG])
    .width(Length::Fill)
    .style(styles::button::primary);

    let content = Column::new()
        .spacing(spacing::MD)
        .push(field::<Material>(
            ctx.i18n,
            "controls-material-label",
            config.material,
            ConfigChange::Material,
        ))
        .push(field::<Color>(
            ctx.i18n,
            "controls-color-label",
            config.color,
            ConfigChange::Color,
        ))
        .push(field::<Hardware>(
            ctx.i18n,
            "controls-hardware-label",
            config.hardware,
            ConfigChange::Hardware,
        ))
        .push(ar_button);

    container(content)
        .padding(spacing::MD)
        .width(Length::Fill)
        .style(styles::container::card)
        .into()
}
