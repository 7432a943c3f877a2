//! File and input helpers

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Expand a user supplied path to an absolute path.
///
/// `~` and `~/...` resolve against the home directory, relative paths
/// against the current directory. Absolute paths pass through.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path))
    } else {
        PathBuf::from(path)
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

/// Resolve a command line input argument to its text.
///
/// `-` reads stdin, `@path` reads a file, anything else is the text itself.
pub fn read_input(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    if let Some(path) = arg.strip_prefix('@') {
        let path = expand_path(path);
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    Ok(arg.to_string())
}
