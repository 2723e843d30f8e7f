//! Layered configuration
//!
//! Defaults, then `~/.config/gust/config.json`, then
//! `<workspace>/.gust/config.json`. A non-empty field in a later layer
//! overrides the earlier value.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::fsutil::write_atomic;

pub const DEFAULT_BUILD_DIR: &str = "build";
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GustConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_board: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_project: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_shield: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub build_dir: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub serial_port: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub serial_baud_rate: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub flash_runner: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub venv_path: String,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl Default for GustConfig {
    fn default() -> Self {
        Self {
            default_board: String::new(),
            last_project: String::new(),
            last_shield: String::new(),
            build_dir: DEFAULT_BUILD_DIR.to_string(),
            serial_port: String::new(),
            serial_baud_rate: DEFAULT_BAUD_RATE,
            flash_runner: String::new(),
            venv_path: String::new(),
        }
    }
}

impl GustConfig {
    /// Overlay every non-empty field of `layer` onto `self`.
    pub fn merge(&mut self, layer: GustConfig) {
        fn take(dst: &mut String, src: String) {
            if !src.is_empty() {
                *dst = src;
            }
        }

        take(&mut self.default_board, layer.default_board);
        take(&mut self.last_project, layer.last_project);
        take(&mut self.last_shield, layer.last_shield);
        take(&mut self.build_dir, layer.build_dir);
        take(&mut self.serial_port, layer.serial_port);
        take(&mut self.flash_runner, layer.flash_runner);
        take(&mut self.venv_path, layer.venv_path);
        if layer.serial_baud_rate != 0 {
            self.serial_baud_rate = layer.serial_baud_rate;
        }
    }
}

/// Configuration persistence
pub trait ConfigService: Send + Sync {
    /// Load the effective configuration
    fn load(&self) -> CoreResult<GustConfig>;

    /// Persist `config`
    fn save(&self, config: &GustConfig) -> CoreResult<()>;

    /// Load, modify and save in one step.
    fn update(&self, apply: &mut dyn FnMut(&mut GustConfig)) -> CoreResult<GustConfig> {
        let mut config = self.load()?;
        apply(&mut config);
        self.save(&config)?;
        Ok(config)
    }
}

/// JSON files under the user's home and the workspace.
#[derive(Debug, Clone)]
pub struct JsonConfigService {
    global_path: Option<PathBuf>,
    workspace_path: PathBuf,
}

impl JsonConfigService {
    /// Standard locations for the workspace at `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            global_path: dirs::home_dir()
                .map(|home| home.join(".config").join("gust").join("config.json")),
            workspace_path: root.join(".gust").join("config.json"),
        }
    }

    pub fn with_paths(global_path: Option<PathBuf>, workspace_path: PathBuf) -> Self {
        Self {
            global_path,
            workspace_path,
        }
    }

    pub fn workspace_path(&self) -> &Path {
        &self.workspace_path
    }

    fn read_layer(path: &Path) -> CoreResult<Option<GustConfig>> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|e| CoreError::ConfigError(format!("{}: {e}", path.display())))
    }
}

impl ConfigService for JsonConfigService {
    fn load(&self) -> CoreResult<GustConfig> {
        let mut config = GustConfig::default();
        let layers = self
            .global_path
            .iter()
            .chain(std::iter::once(&self.workspace_path));
        for path in layers {
            match Self::read_layer(path) {
                Ok(Some(layer)) => config.merge(layer),
                Ok(None) => {}
                Err(e) => log::warn!("Skipping config layer: {e}"),
            }
        }
        Ok(config)
    }

    fn save(&self, config: &GustConfig) -> CoreResult<()> {
        let data = serde_json::to_vec_pretty(config)?;
        write_atomic(&self.workspace_path, &data)?;
        log::debug!("Saved config to {}", self.workspace_path.display());
        Ok(())
    }
}

/// Config kept in memory, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct InMemoryConfigService {
    config: Mutex<GustConfig>,
}

impl InMemoryConfigService {
    pub fn new(config: GustConfig) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }

    pub fn snapshot(&self) -> GustConfig {
        self.config
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl ConfigService for InMemoryConfigService {
    fn load(&self) -> CoreResult<GustConfig> {
        Ok(self.snapshot())
    }

    fn save(&self, config: &GustConfig) -> CoreResult<()> {
        let mut guard = self
            .config
            .lock()
            .map_err(|_| CoreError::ConfigError("config lock poisoned".to_string()))?;
        *guard = config.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GustConfig::default();
        assert_eq!(config.build_dir, "build");
        assert_eq!(config.serial_baud_rate, 115_200);
        assert!(config.default_board.is_empty());
    }

    #[test]
    fn test_workspace_layer_overrides_global() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.json");
        let workspace = dir.path().join("ws").join(".gust").join("config.json");
        fs::write(&global, r#"{"default_board":"qemu_x86","serial_port":"/dev/ttyACM0"}"#)
            .unwrap();
        fs::create_dir_all(workspace.parent().unwrap()).unwrap();
        fs::write(&workspace, r#"{"default_board":"nrf52840dk","serial_baud_rate":9600}"#)
            .unwrap();

        let service = JsonConfigService::with_paths(Some(global), workspace);
        let config = service.load().unwrap();

        assert_eq!(config.default_board, "nrf52840dk");
        assert_eq!(config.serial_port, "/dev/ttyACM0");
        assert_eq!(config.serial_baud_rate, 9600);
        assert_eq!(config.build_dir, "build");
    }

    #[test]
    fn test_missing_and_corrupt_layers_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("broken.json");
        fs::write(&global, "{not json").unwrap();
        let service = JsonConfigService::with_paths(Some(global), dir.path().join("absent.json"));

        assert_eq!(service.load().unwrap(), GustConfig::default());
    }

    #[test]
    fn test_update_persists_to_workspace_file() {
        let dir = tempfile::tempdir().unwrap();
        let service = JsonConfigService::with_paths(None, dir.path().join(".gust/config.json"));

        service
            .update(&mut |c| c.last_project = "app/blinky".to_string())
            .unwrap();

        let reloaded = service.load().unwrap();
        assert_eq!(reloaded.last_project, "app/blinky");
        let raw = fs::read_to_string(service.workspace_path()).unwrap();
        assert!(raw.contains("\"last_project\": \"app/blinky\""));
        assert!(!raw.contains("serial_port"));
    }

    #[test]
    fn test_in_memory_update() {
        let service = InMemoryConfigService::default();
        service
            .update(&mut |c| c.flash_runner = "jlink".to_string())
            .unwrap();
        assert_eq!(service.snapshot().flash_runner, "jlink");
    }
}
