// SPDX-License-Identifier: MPL-2.0
//! Toast notifications for user feedback.
//!
//! - [`Notification`] - message key, arguments and severity
//! - [`Manager`] - queuing and auto-dismiss
//! - [`Toast`] - rendering
//!
//! Toast duration: 3s for success/info, 5s for warnings, manual dismiss
//! for errors. At most three toasts are visible; the rest are queued.

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, Severity};
pub use toast::Toast;
