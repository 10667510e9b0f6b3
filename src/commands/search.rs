use anyhow::Result;
use colored::*;
use std::path::Path;

use vaultmatch_mcp::search::engine::CandidateJson;
use vaultmatch_mcp::SearchOptions;

use super::{load_resolver, truncate_width};

pub fn run(
    vault: &Path,
    config_path: Option<&Path>,
    query: &str,
    tags: Vec<String>,
    limit: Option<usize>,
    min_score: Option<f32>,
    json: bool,
) -> Result<()> {
    let resolver = load_resolver(vault, config_path)?;

    let mut options = SearchOptions::default().with_scope(tags);
    if let Some(limit) = limit {
        options = options.with_max_results(limit.max(1));
    }
    if let Some(min_score) = min_score {
        anyhow::ensure!(
            (0.0..=1.0).contains(&min_score),
            "--min-score must be between 0 and 1"
        );
        options = options.with_min_score(min_score);
    }

    let results = resolver.search(query, &options);

    if json {
        let json_results: Vec<CandidateJson> = results.iter().map(CandidateJson::from).collect();
        println!("{}", serde_json::to_string_pretty(&json_results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("{} No matches for: {}", "→".dimmed(), query.cyan());
        return Ok(());
    }

    println!(
        "{} {} matches for: {}",
        "→".dimmed(),
        results.len(),
        query.cyan()
    );
    println!();

    for (i, result) in results.iter().enumerate() {
        let score_str = format!("{:.2}", result.score);
        let score_colored = if result.score > 0.8 {
            score_str.green()
        } else if result.score > 0.5 {
            score_str.yellow()
        } else {
            score_str.dimmed()
        };

        println!(
            "{}. [{}] {} {}",
            (i + 1).to_string().bold(),
            score_colored,
            truncate_width(&result.note.title, 60).cyan(),
            format!("({})", result.matched_field).dimmed()
        );
        println!("   {}", result.note.path.dimmed());
        if !result.note.tags.is_empty() {
            let tags: Vec<String> = result.note.tags.iter().map(|t| format!("#{}", t)).collect();
            println!("   {}", tags.join(" "));
        }
    }

    Ok(())
}
