// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.

use super::Message;
use crate::ui::ar_popup;
use iced::keyboard::{self, key::Named, Key};
use iced::{event, time, Subscription};
use std::time::Duration;

/// Interval of the notification auto-dismiss tick.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Routes native events while the AR popup is open: Escape closes it.
///
/// Events already handled by a widget (e.g. a focused pick list) are left
/// alone.
pub fn create_event_subscription(popup_open: bool) -> Subscription<Message> {
    if !popup_open {
        return Subscription::none();
    }

    event::listen_with(|event, status, _window_id| {
        if status == event::Status::Captured {
            return None;
        }
        match event {
            event::Event::Keyboard(keyboard::Event::KeyPressed {
                key: Key::Named(Named::Escape),
                ..
            }) => Some(Message::ArPopup(ar_popup::Message::Close)),
            _ => None,
        }
    })
}

/// Creates the periodic tick subscription used to expire toasts.
pub fn create_tick_subscription(has_notifications: bool) -> Subscription<Message> {
    if has_notifications {
        time::every(TICK_INTERVAL).map(Message::Tick)
    } else {
        Subscription::none()
    }
}
