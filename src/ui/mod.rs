// SPDX-License-Identifier: MPL-2.0
//! User interface components.
//!
//! Components follow the Elm-style "state down, messages up" pattern: each
//! takes a `ViewContext` and returns an `Element` of its own `Message`
//! type, which the application maps into its top-level message.
//!
//! # Components
//!
//! - [`model_viewer`] - Interactive 3D view of the backpack (wgpu shader widget)
//! - [`controls`] - Material, color and hardware pick lists plus the AR button
//! - [`ar_popup`] - "View in AR" modal with the hand-off link or inline AR
//! - [`notifications`] - Toast notification system for user feedback
//!
//! # Shared Infrastructure
//!
//! - [`styles`] - Centralized styling (buttons, containers)
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)

pub mod ar_popup;
pub mod controls;
pub mod design_tokens;
pub mod model_viewer;
pub mod notifications;
pub mod styles;
