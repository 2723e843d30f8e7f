use std::fs;
use std::path::Path;

use crate::error::CoreResult;

/// One `CONFIG_NAME=value` line of a `prj.conf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KconfigEntry {
    pub name: String,
    pub value: String,
    pub comment: String,
}

pub fn read_kconfig(path: &Path) -> CoreResult<Vec<KconfigEntry>> {
    Ok(parse_kconfig(&fs::read_to_string(path)?))
}

/// Parse `prj.conf` text. Blank lines, full-line comments and lines
/// without `=` are skipped; a trailing `# ...` becomes the comment.
pub fn parse_kconfig(text: &str) -> Vec<KconfigEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (assignment, comment) = match line.split_once('#') {
                Some((assignment, comment)) => (assignment.trim(), comment.trim()),
                None => (line, ""),
            };
            let (name, value) = assignment.split_once('=')?;
            Some(KconfigEntry {
                name: name.trim().to_string(),
                value: value.trim().to_string(),
                comment: comment.to_string(),
            })
        })
        .collect()
}
