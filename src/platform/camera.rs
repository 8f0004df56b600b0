// SPDX-License-Identifier: MPL-2.0
//! Camera permission and AR activation.
//!
//! [`ar_flow`] runs the "View in your space" sequence: nothing happens on
//! desktop-class devices, an unsupported device gets an alert, a denied
//! camera request aborts with an alert, and only a granted request
//! activates AR. A denial is never retried automatically.

use super::capability::DeviceCapabilities;
use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Grants or denies access to the camera.
///
/// `request` may block (e.g. while a system prompt is shown); [`ar_flow`]
/// runs it on the blocking thread pool.
pub trait CameraAccess: fmt::Debug + Send + Sync {
    fn request(&self) -> Result<()>;
}

/// Places a model in the camera view.
pub trait ArLauncher: fmt::Debug + Send + Sync {
    fn activate(&self, model: &Path) -> Result<()>;
}

/// Camera access backed by the capture devices of the host.
#[derive(Debug, Clone, Default)]
pub struct DeviceCamera {
    device_dir: Option<PathBuf>,
}

impl DeviceCamera {
    /// Looks for capture device nodes in `dir` instead of `/dev`.
    pub fn with_device_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            device_dir: Some(dir.into()),
        }
    }

    fn has_capture_device(&self) -> bool {
        let dir = self
            .device_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("/dev"));
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return false;
        };
        entries.flatten().any(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with("video"))
        })
    }
}

impl CameraAccess for DeviceCamera {
    fn request(&self) -> Result<()> {
        if self.has_capture_device() {
            Ok(())
        } else {
            Err(Error::Permission("no camera available".to_string()))
        }
    }
}

/// Launcher for hosts without an AR runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLauncher;

impl ArLauncher for UnsupportedLauncher {
    fn activate(&self, _model: &Path) -> Result<()> {
        Err(Error::ArUnsupported)
    }
}

/// How a "View in your space" request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ArFlowOutcome {
    /// Desktop-class device: the button does nothing.
    Skipped,
    /// The device cannot do AR.
    Unsupported,
    /// The camera request was refused.
    PermissionDenied(Error),
    /// Permission granted and AR started.
    Activated,
    /// Permission granted but the launcher failed.
    LaunchFailed(Error),
}

impl ArFlowOutcome {
    /// Whether camera permission was granted during the flow.
    #[must_use]
    pub fn permission_granted(&self) -> bool {
        matches!(self, ArFlowOutcome::Activated | ArFlowOutcome::LaunchFailed(_))
    }

    /// Translation key of the alert to show, if any.
    #[must_use]
    pub fn alert_key(&self) -> Option<&'static str> {
        match self {
            ArFlowOutcome::Skipped | ArFlowOutcome::Activated => None,
            ArFlowOutcome::Unsupported => Some(Error::ArUnsupported.i18n_key()),
            ArFlowOutcome::PermissionDenied(error) | ArFlowOutcome::LaunchFailed(error) => {
                Some(error.i18n_key())
            }
        }
    }
}

/// Runs the AR activation sequence for `model`.
pub async fn ar_flow(
    capabilities: Arc<dyn DeviceCapabilities>,
    camera: Arc<dyn CameraAccess>,
    launcher: Arc<dyn ArLauncher>,
    model: PathBuf,
) -> ArFlowOutcome {
    if !capabilities.presentation().is_mobile() {
        tracing::debug!("AR requested on a desktop-class device, ignoring");
        return ArFlowOutcome::Skipped;
    }
    if !capabilities.supports_ar() {
        tracing::info!("AR is not supported on this device");
        return ArFlowOutcome::Unsupported;
    }

    let permission = tokio::task::spawn_blocking(move || camera.request())
        .await
        .unwrap_or_else(|e| Err(Error::Permission(e.to_string())));
    if let Err(error) = permission {
        tracing::warn!(%error, "camera permission denied");
        return ArFlowOutcome::PermissionDenied(error);
    }

    match tokio::task::spawn_blocking(move || launcher.activate(&model)).await {
        Ok(Ok(())) => {
            tracing::info!("AR session activated");
            ArFlowOutcome::Activated
        }
        Ok(Err(Error::ArUnsupported)) => ArFlowOutcome::LaunchFailed(Error::ArUnsupported),
        Ok(Err(error)) => {
            tracing::warn!(%error, "AR activation failed");
            ArFlowOutcome::LaunchFailed(error)
        }
        Err(join) => ArFlowOutcome::LaunchFailed(Error::Io(join.to_string())),
    }
}
