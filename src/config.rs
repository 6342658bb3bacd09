use serde::Deserialize;
use std::path::PathBuf;

/// Indent widths, loadable from a TOML file.
///
/// Code nesting uses `indent_width` per level (default 2). Block comment
/// continuation lines use the heavier `comment_indent_width` (default 3)
/// so they read differently from nested code.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndentConfig {
    pub indent_width: usize,
    pub comment_indent_width: usize,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            comment_indent_width: 3,
        }
    }
}

impl IndentConfig {
    pub fn from_file(path: &PathBuf) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: IndentConfig =
            toml::from_str(&content).map_err(|e| format!("Invalid config format: {}", e))?;

        Ok(config)
    }
}
