// SPDX-License-Identifier: MPL-2.0
//! Centralized styles for the configurator views.

pub mod button;
pub mod container;
