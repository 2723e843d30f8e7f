use std::fs;
use std::path::Path;

use crate::error::CoreResult;

const PORT_PREFIXES: &[&str] = &["ttyUSB", "ttyACM", "cu.usb", "tty.usb"];

/// A serial device node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Full device path, e.g. `/dev/ttyACM0`
    pub name: String,
    pub is_usb: bool,
}

/// USB serial adapters under `/dev`.
pub fn list_ports() -> CoreResult<Vec<PortInfo>> {
    list_ports_in(Path::new("/dev"))
}

fn list_ports_in(dev: &Path) -> CoreResult<Vec<PortInfo>> {
    let mut ports: Vec<PortInfo> = fs::read_dir(dev)?
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            PORT_PREFIXES
                .iter()
                .any(|prefix| file_name.starts_with(prefix))
                .then(|| PortInfo {
                    name: entry.path().to_string_lossy().into_owned(),
                    is_usb: file_name.contains("USB") || file_name.contains("usb"),
                })
        })
        .collect();
    ports.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(ports)
}
