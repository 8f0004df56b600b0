// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! Translations are Fluent resources embedded from `assets/i18n/`. The
//! active locale is resolved from the command line, then the settings file,
//! then the operating system, falling back to `en-US`.

pub mod fluent;

pub use fluent::I18n;
