use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::CoreResult;

const SKIP_DIRS: &[&str] = &[
    ".git",
    "build",
    "twister-out",
    ".west",
    "node_modules",
    "__pycache__",
];

const MARKER: &str = "find_package(Zephyr";
const SNIFF_BYTES: u64 = 512;

/// A buildable Zephyr application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Last path segment
    pub name: String,
    /// Relative to the workspace root, `/`-separated
    pub path: String,
}

/// Find every directory under `scan_root` whose `CMakeLists.txt` pulls in
/// Zephyr, sorted by path relative to `ws_root`.
pub fn discover_projects(scan_root: &Path, ws_root: &Path) -> CoreResult<Vec<Project>> {
    let mut projects = Vec::new();
    walk(scan_root, ws_root, &mut projects)?;
    projects.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(projects)
}

fn walk(dir: &Path, ws_root: &Path, out: &mut Vec<Project>) -> CoreResult<()> {
    let cmake = dir.join("CMakeLists.txt");
    if cmake.is_file() && declares_zephyr_app(&cmake) {
        if let Ok(rel) = dir.strip_prefix(ws_root) {
            let path = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let name = dir
                .file_name()
                .map_or_else(|| path.clone(), |n| n.to_string_lossy().into_owned());
            out.push(Project { name, path });
        }
    }

    for entry in fs::read_dir(dir)?.filter_map(Result::ok) {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if SKIP_DIRS.iter().any(|skip| name == *skip) {
            continue;
        }
        if let Err(e) = walk(&entry.path(), ws_root, out) {
            log::debug!("Skipping {}: {e}", entry.path().display());
        }
    }
    Ok(())
}

fn declares_zephyr_app(cmake: &Path) -> bool {
    let Ok(file) = fs::File::open(cmake) else {
        return false;
    };
    let mut head = Vec::new();
    if file.take(SNIFF_BYTES).read_to_end(&mut head).is_err() {
        return false;
    }
    String::from_utf8_lossy(&head).contains(MARKER)
}
