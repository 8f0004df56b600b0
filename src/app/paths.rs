// SPDX-License-Identifier: MPL-2.0
//! Centralized path management for application directories.
//!
//! # Path Resolution Order
//!
//! Paths are resolved in the following priority order:
//! 1. **Explicit override** - parameter to `_with_override()` functions (for tests)
//! 2. **CLI arguments** (`--config-dir`, `--assets`) - set via [`init_cli_overrides`]
//! 3. **Environment variables** (`BACKPACK_CONFIGURATOR_CONFIG_DIR`,
//!    `BACKPACK_CONFIGURATOR_ASSETS_DIR`)
//! 4. **Settings** - `[assets] root` (assets only)
//! 5. **Platform default** - via `dirs` crate for the config directory,
//!    `./assets` for the asset root
//!
//! CLI overrides should be initialized once at startup:
//! ```ignore
//! paths::init_cli_overrides(flags.config_dir.clone(), flags.assets_dir.clone());
//! ```

use super::config::defaults::{DEFAULT_ASSETS_DIR, MODEL_FILE};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Application name used for directory naming.
const APP_NAME: &str = "BackpackConfigurator";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "BACKPACK_CONFIGURATOR_CONFIG_DIR";

/// Environment variable to override the asset root.
pub const ENV_ASSETS_DIR: &str = "BACKPACK_CONFIGURATOR_ASSETS_DIR";

static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static CLI_ASSETS_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Records the `--config-dir` and `--assets` arguments.
///
/// Only the first call has an effect.
pub fn init_cli_overrides(config_dir: Option<String>, assets_dir: Option<String>) {
    let config_set = CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_ok();
    let assets_set = CLI_ASSETS_DIR.set(assets_dir.map(PathBuf::from)).is_ok();
    if !(config_set && assets_set) {
        tracing::warn!("CLI path overrides were already initialized");
    }
}

fn get_cli_config_dir() -> Option<PathBuf> {
    CLI_CONFIG_DIR.get().and_then(Clone::clone)
}

fn get_cli_assets_dir() -> Option<PathBuf> {
    CLI_ASSETS_DIR.get().and_then(Clone::clone)
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Returns the directory holding `settings.toml`.
///
/// Platform defaults:
/// - Linux: `~/.config/BackpackConfigurator/`
/// - macOS: `~/Library/Application Support/BackpackConfigurator/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\BackpackConfigurator\`
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Returns the config directory with an optional override.
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }
    if let Some(path) = get_cli_config_dir() {
        return Some(path);
    }
    if let Some(path) = env_path(ENV_CONFIG_DIR) {
        return Some(path);
    }
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Returns the asset root holding `models/` and `textures/`.
///
/// `configured` is the `[assets] root` setting.
pub fn get_assets_dir_with_override(
    override_path: Option<PathBuf>,
    configured: Option<&Path>,
) -> PathBuf {
    override_path
        .or_else(get_cli_assets_dir)
        .or_else(|| env_path(ENV_ASSETS_DIR))
        .or_else(|| configured.map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR))
}

/// Location of the backpack model under an asset root.
#[must_use]
pub fn model_path(assets: &Path) -> PathBuf {
    assets.join(MODEL_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to prevent parallel tests from interfering with each other's env vars
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn app_config_dir_contains_app_name() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(ENV_CONFIG_DIR);

        if let Some(path) = get_app_config_dir() {
            assert!(
                path.to_string_lossy().contains(APP_NAME),
                "App config dir should contain app name"
            );
        }
    }

    #[test]
    fn override_path_takes_precedence_for_config_dir() {
        let override_path = PathBuf::from("/custom/config/path");
        let result = get_app_config_dir_with_override(Some(override_path.clone()));
        assert_eq!(result, Some(override_path));
    }

    #[test]
    fn env_var_overrides_default_config_dir() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let test_path = "/test/config/dir";
        std::env::set_var(ENV_CONFIG_DIR, test_path);

        let result = get_app_config_dir();
        assert_eq!(result, Some(PathBuf::from(test_path)));

        std::env::remove_var(ENV_CONFIG_DIR);
    }

    #[test]
    fn empty_env_var_uses_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "");

        if let Some(path) = get_app_config_dir() {
            assert!(path.to_string_lossy().contains(APP_NAME));
        }

        std::env::remove_var(ENV_CONFIG_DIR);
    }

    #[test]
    fn assets_dir_prefers_env_over_settings() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_ASSETS_DIR, "/env/assets");

        let result = get_assets_dir_with_override(None, Some(Path::new("/settings/assets")));
        assert_eq!(result, PathBuf::from("/env/assets"));

        std::env::remove_var(ENV_ASSETS_DIR);
    }

    #[test]
    fn assets_dir_falls_back_to_settings_then_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(ENV_ASSETS_DIR);

        assert_eq!(
            get_assets_dir_with_override(None, Some(Path::new("/settings/assets"))),
            PathBuf::from("/settings/assets")
        );
        assert_eq!(
            get_assets_dir_with_override(None, None),
            PathBuf::from(DEFAULT_ASSETS_DIR)
        );
    }

    #[test]
    fn model_lives_under_models_dir() {
        let root = Path::new("/srv/shop");
        assert_eq!(model_path(root), PathBuf::from("/srv/shop/models/backpack.glb"));
    }
}
