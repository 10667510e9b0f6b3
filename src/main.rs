mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "vaultmatch")]
#[command(about = "Obsidian vault tools with fuzzy note resolution and an MCP server", long_about = None)]
#[command(version)]
struct Cli {
    /// Vault root (defaults to the current directory)
    #[arg(long, global = true, env = "VAULT_PATH")]
    vault: Option<PathBuf>,

    /// Config file (defaults to <vault>/.vaultmatch.yaml)
    #[arg(long, global = true, env = "VAULTMATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging (outputs to stderr)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fuzzy search over note titles, tags and content
    Search {
        query: String,
        #[arg(long = "tag", help = "Only notes with this tag (repeatable)")]
        tags: Vec<String>,
        #[arg(long, short, help = "Limit results")]
        limit: Option<usize>,
        #[arg(long, help = "Minimum score between 0 and 1")]
        min_score: Option<f32>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Print a note, resolving approximate names
    Get {
        note: String,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show index status
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },

    // ===== MCP Server =====
    /// Start MCP server over stdio
    #[cfg(feature = "mcp")]
    Mcp {
        #[arg(long, help = "Show MCP client configuration instructions")]
        install: bool,
    },
}

fn init_logging(verbose: bool) {
    // stdout carries the MCP protocol, so logs go to stderr
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let vault = commands::vault_root(cli.vault)?;
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Search {
            query,
            tags,
            limit,
            min_score,
            json,
        } => commands::search::run(&vault, config, &query, tags, limit, min_score, json),
        Commands::Get { note, json } => commands::get::run(&vault, config, &note, json),
        Commands::Status { json } => commands::status::run(&vault, config, json),

        // MCP Server
        #[cfg(feature = "mcp")]
        Commands::Mcp { install } => {
            if install {
                print_mcp_install_instructions(&vault);
                Ok(())
            } else {
                run_mcp_server(vault, config)
            }
        }
    }
}

#[cfg(feature = "mcp")]
fn run_mcp_server(vault: PathBuf, config_path: Option<&std::path::Path>) -> anyhow::Result<()> {
    let config = vaultmatch_mcp::Config::load(&vault, config_path)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(vaultmatch_mcp::mcp::run_mcp_server(vault, config))
}

#[cfg(feature = "mcp")]
fn print_mcp_install_instructions(vault: &std::path::Path) {
    use colored::Colorize;

    let binary_path = std::env::current_exe()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "vaultmatch".to_string());

    println!("{}", "MCP Server Installation Guide".bold().cyan());
    println!();
    println!("Add the following to your MCP client configuration:");
    println!();
    println!(
        r#"{{
  "mcpServers": {{
    "obsidian-vault": {{
      "command": "{}",
      "args": ["mcp", "--vault", "{}"]
    }}
  }}
}}"#,
        binary_path,
        vault.display()
    );
    println!();
    println!("{}", "Available tools:".bold());
    println!("  • {} - Fuzzy search by title, tags or content", "vault_search".green());
    println!("  • {} - Get a note by path, title or approximate name", "vault_get_note".green());
    println!("  • {} - List notes with an optional tag filter", "vault_list_notes".green());
    println!("  • {} - Get index status", "vault_status".green());
    println!("  • {} - Rescan the vault", "vault_reindex".green());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let cli = Cli::try_parse_from(["vaultmatch", "search", "projct plan"]).unwrap();
        match cli.command {
            Commands::Search { query, tags, limit, .. } => {
                assert_eq!(query, "projct plan");
                assert!(tags.is_empty());
                assert!(limit.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from([
            "vaultmatch", "search", "plan", "--tag", "work", "--tag", "home", "-l", "3",
            "--vault", "/tmp/vault", "-v",
        ])
        .unwrap();
        assert_eq!(cli.vault, Some(PathBuf::from("/tmp/vault")));
        assert!(cli.verbose);
        match cli.command {
            Commands::Search { tags, limit, .. } => {
                assert_eq!(tags, vec!["work", "home"]);
                assert_eq!(limit, Some(3));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_get_requires_note() {
        assert!(Cli::try_parse_from(["vaultmatch", "get"]).is_err());
    }
}
