use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::executor::ExecContext;

#[cfg(windows)]
const VENV_BIN: &str = "Scripts";
#[cfg(not(windows))]
const VENV_BIN: &str = "bin";

#[cfg(windows)]
const WEST_EXE: &str = "west.exe";
#[cfg(not(windows))]
const WEST_EXE: &str = "west";

/// A detected west workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Parent of `.west/`, or the directory holding `west.yml`
    pub root: PathBuf,
    pub manifest_path: Option<PathBuf>,
    /// `.west/` exists
    pub initialized: bool,
}

/// Which setup steps of the workspace are complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkspaceHealth {
    pub west_initialized: bool,
    pub modules_updated: bool,
    pub zephyr_exported: bool,
    pub python_env: bool,
    pub sdk_installed: bool,
}

impl WorkspaceHealth {
    pub fn all_ok(&self) -> bool {
        self.west_initialized
            && self.modules_updated
            && self.zephyr_exported
            && self.python_env
            && self.sdk_installed
    }
}

impl Workspace {
    /// Walk up from `start` to the nearest `.west/` directory.
    ///
    /// Without one, the nearest `west.yml` marks an uninitialized workspace.
    pub fn detect(start: &Path) -> CoreResult<Self> {
        let start = if start.is_absolute() {
            start.to_path_buf()
        } else {
            std::env::current_dir()?.join(start)
        };

        let mut manifest_candidate: Option<PathBuf> = None;
        for dir in start.ancestors() {
            if dir.join(".west").is_dir() {
                return Ok(Self {
                    root: dir.to_path_buf(),
                    manifest_path: resolve_manifest(dir),
                    initialized: true,
                });
            }
            if manifest_candidate.is_none() {
                let manifest = dir.join("west.yml");
                if manifest.is_file() {
                    manifest_candidate = Some(manifest);
                }
            }
        }

        match manifest_candidate {
            Some(manifest) => Ok(Self {
                root: manifest
                    .parent()
                    .map_or_else(|| start.clone(), Path::to_path_buf),
                manifest_path: Some(manifest),
                initialized: false,
            }),
            None => Err(CoreError::WorkspaceNotFound(start)),
        }
    }

    /// `<root>/.gust`, home of config and history.
    pub fn gust_dir(&self) -> PathBuf {
        self.root.join(".gust")
    }

    /// Directory scanned for projects: the manifest repository.
    pub fn project_root(&self) -> &Path {
        self.manifest_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(&self.root)
    }

    pub fn check_health(&self) -> WorkspaceHealth {
        let home = dirs::home_dir();
        WorkspaceHealth {
            west_initialized: self.initialized,
            modules_updated: self.root.join("zephyr").is_dir(),
            zephyr_exported: home
                .as_ref()
                .is_some_and(|h| h.join(".cmake").join("packages").join("Zephyr").is_dir()),
            python_env: self.root.join(".venv").join("lib").is_dir(),
            sdk_installed: home.as_deref().is_some_and(sdk_registered)
                || std::env::var_os("ZEPHYR_SDK_INSTALL_DIR")
                    .is_some_and(|dir| Path::new(&dir).join("sdk_version").is_file()),
        }
    }

    /// Execution context for west commands in this workspace.
    ///
    /// Runs from the workspace root. When a virtual environment with a
    /// `west` executable is found (`venv_override` first, then
    /// `<root>/.venv`), its bin directory is put first on `PATH` and `west`
    /// resolves to that executable.
    pub fn exec_context(&self, venv_override: Option<&Path>) -> ExecContext {
        let context = ExecContext::new().with_working_dir(&self.root);

        let default_venv = self.root.join(".venv");
        let candidates = venv_override.into_iter().chain(std::iter::once(default_venv.as_path()));
        for venv in candidates {
            let bin_dir = venv.join(VENV_BIN);
            let west = bin_dir.join(WEST_EXE);
            if west.is_file() {
                log::info!("Using west from {}", west.display());
                return context.with_path_prefix(&bin_dir).with_program("west", west);
            }
        }

        log::debug!("No virtual environment found, using west from PATH");
        context
    }
}

/// Read `[manifest] path/file` from `.west/config`.
fn resolve_manifest(root: &Path) -> Option<PathBuf> {
    let config = fs::read_to_string(root.join(".west").join("config")).ok()?;

    let mut in_manifest = false;
    let mut dir = None;
    let mut file = None;
    for line in config.lines().map(str::trim) {
        if line.starts_with('[') {
            in_manifest = line == "[manifest]";
            continue;
        }
        if !in_manifest {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            match key.trim() {
                "path" => dir = Some(value.trim().to_string()),
                "file" => file = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    let dir = dir.filter(|d| !d.is_empty())?;
    let file = file.unwrap_or_else(|| "west.yml".to_string());
    Some(root.join(dir).join(file))
}

/// The SDK registered itself with CMake and its directory is intact.
fn sdk_registered(home: &Path) -> bool {
    let registry = home.join(".cmake").join("packages").join("Zephyr-sdk");
    let Ok(entries) = fs::read_dir(registry) else {
        return false;
    };
    entries
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .filter_map(|e| fs::read_to_string(e.path()).ok())
        .any(|sdk| Path::new(sdk.trim()).join("sdk_version").is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_initialized_workspace_from_subdir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".west")).unwrap();
        fs::write(
            root.join(".west").join("config"),
            "[manifest]\npath = app\nfile = west.yml\n\n[zephyr]\nbase = zephyr\n",
        )
        .unwrap();
        let nested = root.join("app").join("src");
        fs::create_dir_all(&nested).unwrap();

        let ws = Workspace::detect(&nested).unwrap();

        assert_eq!(ws.root, root);
        assert!(ws.initialized);
        assert_eq!(ws.manifest_path, Some(root.join("app").join("west.yml")));
        assert_eq!(ws.project_root(), root.join("app"));
    }

    #[test]
    fn test_manifest_file_defaults_to_west_yml() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".west")).unwrap();
        fs::write(dir.path().join(".west/config"), "[manifest]\npath = fw\n").unwrap();

        assert_eq!(
            resolve_manifest(dir.path()),
            Some(dir.path().join("fw").join("west.yml"))
        );
    }

    #[test]
    fn test_keys_outside_manifest_section_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".west")).unwrap();
        fs::write(dir.path().join(".west/config"), "[build]\npath = nope\n").unwrap();

        assert_eq!(resolve_manifest(dir.path()), None);
    }

    #[test]
    fn test_detect_falls_back_to_west_yml() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("repo");
        fs::create_dir_all(repo.join("boards")).unwrap();
        fs::write(repo.join("west.yml"), "manifest: {}\n").unwrap();

        let ws = Workspace::detect(&repo.join("boards")).unwrap();

        assert!(!ws.initialized);
        assert_eq!(ws.root, repo);
        assert_eq!(ws.manifest_path, Some(repo.join("west.yml")));
    }

    #[test]
    fn test_health_reflects_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("zephyr")).unwrap();
        let ws = Workspace {
            root: dir.path().to_path_buf(),
            manifest_path: None,
            initialized: true,
        };

        let health = ws.check_health();
        assert!(health.west_initialized);
        assert!(health.modules_updated);
        assert!(!health.python_env);
        assert!(!health.all_ok());
    }

    #[test]
    fn test_exec_context_prefers_workspace_venv() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join(".venv").join(VENV_BIN);
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join(WEST_EXE), "").unwrap();
        let ws = Workspace {
            root: dir.path().to_path_buf(),
            manifest_path: None,
            initialized: true,
        };

        let context = ws.exec_context(None);

        assert_eq!(context.program("west"), bin.join(WEST_EXE));
        assert_eq!(context.working_dir(), Some(dir.path()));
        assert_eq!(context.program("cmake"), PathBuf::from("cmake"));
    }

    #[test]
    fn test_exec_context_without_venv_uses_path() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace {
            root: dir.path().to_path_buf(),
            manifest_path: None,
            initialized: false,
        };

        assert_eq!(ws.exec_context(None).program("west"), PathBuf::from("west"));
    }
}
