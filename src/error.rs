// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Io(String),
    Config(String),
    Model(String),
    Texture(String),
    /// A configuration value outside its enumerated options.
    InvalidOption {
        field: &'static str,
        value: String,
    },
    Handoff(String),
    /// Camera access was refused or no camera is present.
    Permission(String),
    ArUnsupported,
}

impl Error {
    /// Returns the i18n message key used when this error is shown to the user.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Error::Io(_) => "error-io",
            Error::Config(_) => "notification-config-load-error",
            Error::Model(_) => "error-model-load",
            Error::Texture(_) => "warning-texture-load",
            Error::InvalidOption { .. } => "error-invalid-option",
            Error::Handoff(_) => "error-handoff-url",
            Error::Permission(_) => "ar-camera-permission-denied",
            Error::ArUnsupported => "ar-unsupported",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Model(e) => write!(f, "Model Error: {}", e),
            Error::Texture(e) => write!(f, "Texture Error: {}", e),
            Error::InvalidOption { field, value } => {
                write!(f, "Invalid {} option: {:?}", field, value)
            }
            Error::Handoff(e) => write!(f, "Hand-off URL Error: {}", e),
            Error::Permission(e) => write!(f, "Camera permission denied: {}", e),
            Error::ArUnsupported => write!(f, "AR is not supported on this device"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Model(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Texture(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn invalid_option_names_field_and_value() {
        let err = Error::InvalidOption {
            field: "color",
            value: "purple".into(),
        };
        assert_eq!(format!("{}", err), "Invalid color option: \"purple\"");
    }

    #[test]
    fn json_error_maps_to_model_variant() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Model(_)));
    }

    #[test]
    fn user_facing_errors_have_ar_keys() {
        assert_eq!(Error::ArUnsupported.i18n_key(), "ar-unsupported");
        assert_eq!(
            Error::Permission("denied".into()).i18n_key(),
            "ar-camera-permission-denied"
        );
    }
}
