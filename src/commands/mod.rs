pub mod get;
pub mod search;
pub mod status;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use vaultmatch_mcp::{Config, NoteResolver};

/// Vault root from `--vault`/`VAULT_PATH`, else the current directory
pub fn vault_root(vault: Option<PathBuf>) -> Result<PathBuf> {
    match vault {
        Some(path) => Ok(path),
        None => std::env::current_dir().context("Failed to get current directory"),
    }
}

/// Load config and build a resolver over a fresh scan of the vault
pub fn load_resolver(vault: &Path, config_path: Option<&Path>) -> Result<NoteResolver> {
    let config = Config::load(vault, config_path)?;
    let resolver = NoteResolver::new(vault.to_path_buf(), &config)?;
    resolver
        .index_vault()
        .with_context(|| format!("Failed to scan vault at {}", vault.display()))?;
    Ok(resolver)
}

/// Cut `s` to at most `max_width` terminal columns, marking the cut with "..."
pub fn truncate_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_width() {
        assert_eq!(truncate_width("short", 10), "short");
        assert_eq!(truncate_width("a longer title", 8), "a lon...");
        // Wide chars count double
        assert_eq!(truncate_width("日本語のノート", 9), "日本語...");
    }
}
