// SPDX-License-Identifier: MPL-2.0
//! Device integration points for the AR flow.
//!
//! The application never inspects the device directly; it asks the
//! [`DeviceCapabilities`] probe which presentation to use and goes through
//! [`CameraAccess`] and [`ArLauncher`] to activate AR. Tests inject their
//! own implementations.

pub mod camera;
pub mod capability;

pub use camera::{ar_flow, ArFlowOutcome, ArLauncher, CameraAccess, DeviceCamera, UnsupportedLauncher};
pub use capability::{DeviceCapabilities, Presentation, SystemProbe, UserAgentProbe};
