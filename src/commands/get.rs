use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

use vaultmatch_mcp::search::Resolution;

use super::load_resolver;

pub fn run(vault: &Path, config_path: Option<&Path>, note: &str, json: bool) -> Result<()> {
    let resolver = load_resolver(vault, config_path)?;
    let resolution = resolver.resolve(note)?;
    let record = resolution.note();

    let file = resolver.vault_paths().absolute(&record.path);
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "title": record.title,
                "path": record.path,
                "tags": record.tags,
                "score": resolution.score(),
                "content": content,
            }))?
        );
        return Ok(());
    }

    if let Resolution::Fuzzy { best, alternatives } = &resolution {
        eprintln!(
            "{} Closest match for \"{}\" (score {:.2})",
            "!".yellow(),
            note,
            best.score
        );
        for alt in alternatives {
            eprintln!("  {} {} ({:.2})", "→".dimmed(), alt.note.title, alt.score);
        }
        eprintln!();
    }

    println!("{}", record.title.bold().cyan());
    println!("{}", record.path.dimmed());
    println!();
    println!("{}", content);

    Ok(())
}
