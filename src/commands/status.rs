use anyhow::Result;
use colored::*;
use std::path::Path;

use super::load_resolver;

pub fn run(vault: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    let resolver = load_resolver(vault, config_path)?;
    let stats = resolver.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Vault Status".bold());
    println!();
    println!("  {} {}", "→".dimmed(), vault.display());
    println!(
        "  {} {} notes indexed",
        "→".dimmed(),
        stats.note_count.to_string().cyan()
    );
    println!(
        "  {} {} distinct tags",
        "→".dimmed(),
        stats.tag_count.to_string().cyan()
    );
    if let Some(ts) = stats.last_indexed {
        println!(
            "  {} Scanned: {}",
            "→".dimmed(),
            ts.format("%Y-%m-%d %H:%M:%S")
        );
    }

    Ok(())
}
