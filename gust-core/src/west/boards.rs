/// One entry of `west boards`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub name: String,
    pub architecture: String,
    pub qualifiers: String,
}

/// Parse `west boards` output.
///
/// The format varies by Zephyr version: either a bare board name per line
/// or `name arch qualifiers...`.
pub fn parse_boards(output: &str) -> Vec<Board> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let architecture = fields.next().unwrap_or_default();
            Some(Board {
                name: name.to_string(),
                architecture: architecture.to_string(),
                qualifiers: fields.collect::<Vec<_>>().join(" "),
            })
        })
        .collect()
}
