// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! The configuration is organized into logical sections:
//! - `[general]` - Language
//! - `[assets]` - Asset root holding the model and textures
//! - `[model]` - Name of the mesh that receives the hardware material
//! - `[textures]` - Decoded texture cache size
//! - `[handoff]` - Origin of the AR hand-off link
//! - `[startup]` - Configuration shown at launch
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` or set `BACKPACK_CONFIGURATOR_CONFIG_DIR`
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use backpack_configurator::app::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Modify a setting and write it to an explicit file
//! config.general.language = Some("uk".to_string());
//! config::save_to_path(&config, std::path::Path::new("settings.toml"))
//!     .expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::domain::{Color, Configuration, Hardware, Material};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "uk").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Asset location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AssetsConfig {
    /// Directory containing `models/backpack.glb` and `textures/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

/// Model conventions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Mesh that receives the hardware material.
    #[serde(
        default = "default_hardware_mesh",
        skip_serializing_if = "Option::is_none"
    )]
    pub hardware_mesh: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            hardware_mesh: default_hardware_mesh(),
        }
    }
}

/// Texture cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TexturesConfig {
    /// Number of decoded textures kept in memory.
    #[serde(
        default = "default_cache_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub cache_capacity: Option<usize>,
}

impl Default for TexturesConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// AR hand-off link settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandoffConfig {
    /// Origin the hand-off link points at.
    #[serde(default = "default_origin", skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
        }
    }
}

/// Configuration shown at launch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StartupConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<Hardware>,
}

impl StartupConfig {
    /// Fills unset fields with their default option.
    #[must_use]
    pub fn configuration(&self) -> Configuration {
        Configuration::from_options(self.material, self.color, self.hardware)
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub textures: TexturesConfig,

    #[serde(default)]
    pub handoff: HandoffConfig,

    #[serde(default)]
    pub startup: StartupConfig,
}

impl Config {
    /// Hardware mesh name, falling back to the shipped model's convention.
    pub fn hardware_mesh(&self) -> &str {
        self.model
            .hardware_mesh
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_HARDWARE_MESH)
    }

    /// Cache capacity clamped to the supported range.
    pub fn cache_capacity(&self) -> usize {
        self.textures
            .cache_capacity
            .unwrap_or(DEFAULT_TEXTURE_CACHE_CAPACITY)
            .clamp(MIN_TEXTURE_CACHE_CAPACITY, MAX_TEXTURE_CACHE_CAPACITY)
    }

    pub fn handoff_origin(&self) -> &str {
        self.handoff
            .origin
            .as_deref()
            .unwrap_or(DEFAULT_HANDOFF_ORIGIN)
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_hardware_mesh() -> Option<String> {
    Some(DEFAULT_HARDWARE_MESH.to_string())
}

fn default_cache_capacity() -> Option<usize> {
    Some(DEFAULT_TEXTURE_CACHE_CAPACITY)
}

fn default_origin() -> Option<String> {
    Some(DEFAULT_HANDOFF_ORIGIN.to_string())
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with the i18n key of a warning explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable settings");
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            general: GeneralConfig {
                language: Some("uk".to_string()),
            },
            assets: AssetsConfig {
                root: Some(PathBuf::from("/srv/backpack")),
            },
            model: ModelConfig {
                hardware_mesh: Some("Buckles".to_string()),
            },
            textures: TexturesConfig {
                cache_capacity: Some(24),
            },
            handoff: HandoffConfig {
                origin: Some("https://shop.example".to_string()),
            },
            startup: StartupConfig {
                material: Some(Material::Leather),
                color: Some(Color::DarkBlue),
                hardware: None,
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_startup_option_is_a_config_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[startup]\ncolor = \"purple\"\n").unwrap();

        assert!(matches!(load_from_path(&config_path), Err(Error::Config(_))));
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.general.language, None);
        assert_eq!(config.assets.root, None);
        assert_eq!(config.hardware_mesh(), "Mesh_1");
        assert_eq!(config.cache_capacity(), DEFAULT_TEXTURE_CACHE_CAPACITY);
        assert_eq!(config.handoff_origin(), DEFAULT_HANDOFF_ORIGIN);
        assert_eq!(config.startup.configuration(), Configuration::default());
    }

    #[test]
    fn sectioned_format_loads_correctly() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        let content = r#"
[general]
language = "en-US"

[textures]
cache_capacity = 2

[startup]
material = "fabric"
hardware = "gold"
"#;
        fs::write(&config_path, content).unwrap();

        let config = load_from_path(&config_path).unwrap();
        assert_eq!(config.general.language.as_deref(), Some("en-US"));
        assert_eq!(config.cache_capacity(), MIN_TEXTURE_CACHE_CAPACITY);
        assert_eq!(config.hardware_mesh(), DEFAULT_HARDWARE_MESH);
        assert_eq!(
            config.startup.configuration(),
            Configuration::new(Material::Fabric, Color::Brown, Hardware::Gold)
        );
    }

    #[test]
    fn blank_hardware_mesh_falls_back_to_default() {
        let mut config = Config::default();
        config.model.hardware_mesh = Some("  ".to_string());
        assert_eq!(config.hardware_mesh(), DEFAULT_HARDWARE_MESH);
    }

    #[test]
    fn oversized_cache_is_clamped() {
        let mut config = Config::default();
        config.textures.cache_capacity = Some(10_000);
        assert_eq!(config.cache_capacity(), MAX_TEXTURE_CACHE_CAPACITY);
    }

    #[test]
    fn saved_file_is_found_by_load_with_override() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();

        let mut config = Config::default();
        config.handoff.origin = Some("https://example.org".to_string());
        save_to_path(&config, &base_dir.join(CONFIG_FILE)).expect("save should succeed");

        let (loaded, warning) = load_with_override(Some(base_dir));
        assert!(warning.is_none());
        assert_eq!(loaded.handoff_origin(), "https://example.org");
    }

    #[test]
    fn load_with_override_from_empty_directory_returns_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn load_with_override_from_corrupted_file_returns_default_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[[[ broken").unwrap();

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
    }

    #[test]
    fn saved_config_uses_sectioned_format() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        save_to_path(&Config::default(), &config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[model]"));
        assert!(content.contains("hardware_mesh = \"Mesh_1\""));
        assert!(content.contains("[handoff]"));
    }
}
