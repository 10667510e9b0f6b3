//! Vault MCP Server implementation

use anyhow::Result;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Error;
use crate::search::engine::{CandidateJson, NoteResolver, Resolution};
use crate::search::ranker::SearchOptions;
use crate::search::record::NoteRecord;

/// Parameters for vault_search tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Partial title, misspelling or content fragment (e.g., "projct plan")
    #[schemars(description = "Partial title, misspelled title, or content fragment")]
    pub query: String,
    /// Only consider notes with at least one of these tags
    #[schemars(description = "Restrict to notes carrying any of these tags")]
    #[serde(default)]
    pub tags: Vec<String>,
    /// Maximum number of results to return (default: 10)
    #[schemars(description = "Maximum number of results (default: 10, max: 100)")]
    #[serde(default)]
    pub limit: Option<usize>,
    /// Minimum confidence score in [0, 1] (default: 0.3)
    #[schemars(description = "Minimum score between 0 and 1 (default: 0.3)")]
    #[serde(default)]
    pub min_score: Option<f32>,
}

/// Parameters for vault_get_note tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetNoteParams {
    /// Note path, title, alias, or an approximate title
    #[schemars(description = "Note path, title, alias, or approximate title")]
    pub note: String,
}

/// Parameters for vault_list_notes tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListNotesParams {
    /// Filter by tag
    #[schemars(description = "Only list notes with this tag")]
    #[serde(default)]
    pub tag: Option<String>,
    /// Maximum number of results (default: 50)
    #[schemars(description = "Maximum results (default: 50, max: 500)")]
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

fn default_list_limit() -> usize {
    50
}

/// Note info for JSON output
#[derive(Debug, Serialize)]
struct NoteInfoJson {
    title: String,
    path: String,
    tags: Vec<String>,
    aliases: Vec<String>,
}

impl From<&NoteRecord> for NoteInfoJson {
    fn from(record: &NoteRecord) -> Self {
        Self {
            title: record.title.clone(),
            path: record.path.clone(),
            tags: record.tags.iter().cloned().collect(),
            aliases: record.aliases.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResolvedNoteJson {
    #[serde(flatten)]
    note: NoteInfoJson,
    resolution: &'static str,
    score: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    alternatives: Vec<CandidateJson>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })
}

/// Vault MCP Service
#[derive(Clone)]
pub struct VaultService {
    resolver: Arc<NoteResolver>,
    tool_router: ToolRouter<Self>,
}

impl VaultService {
    pub fn new(resolver: Arc<NoteResolver>) -> Self {
        Self {
            resolver,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl VaultService {
    /// Fuzzy search over note titles, tags and content
    #[tool(description = "Find notes in the Obsidian vault from a partial title, a misspelling, or a content fragment. Returns ranked candidates with confidence scores (0-1) and the field that matched.")]
    async fn vault_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        // Clamp limit: max 100 (DoS prevention)
        let mut options = SearchOptions::default().with_scope(params.tags);
        if let Some(limit) = params.limit {
            options = options.with_max_results(limit.clamp(1, 100));
        }
        if let Some(min_score) = params.min_score {
            if !(0.0..=1.0).contains(&min_score) {
                return Err(McpError::invalid_params(
                    format!("min_score must be between 0 and 1, got {}", min_score),
                    None,
                ));
            }
            options = options.with_min_score(min_score);
        }

        let results: Vec<CandidateJson> = self
            .resolver
            .search(&params.query, &options)
            .iter()
            .map(CandidateJson::from)
            .collect();
        tracing::debug!("vault_search {:?}: {} results", params.query, results.len());

        Ok(CallToolResult::success(vec![Content::text(to_json(&results)?)]))
    }

    /// Get full content of a note, resolving approximate names
    #[tool(description = "Get the full content and metadata of a note. Accepts an exact path, a title or alias, or an approximate title; approximate matches report their score and alternatives.")]
    async fn vault_get_note(
        &self,
        params: Parameters<GetNoteParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = &params.0.note;

        let resolution = match self.resolver.resolve(query) {
            Ok(resolution) => resolution,
            Err(Error::NoteNotFound(_)) => {
                return Ok(CallToolResult::success(vec![Content::text(format!(
                    "Note not found: {}",
                    query
                ))]));
            }
            Err(e) => return Err(McpError::internal_error(e.to_string(), None)),
        };

        let note = resolution.note();
        let file = self.resolver.vault_paths().absolute(&note.path);
        let content = std::fs::read_to_string(&file).map_err(|e| {
            McpError::internal_error(format!("Failed to read note: {}", e), None)
        })?;

        let (kind, alternatives) = match &resolution {
            Resolution::Exact(_) => ("exact", Vec::new()),
            Resolution::Fuzzy { alternatives, .. } => (
                "fuzzy",
                alternatives.iter().map(CandidateJson::from).collect(),
            ),
        };
        let info = ResolvedNoteJson {
            note: NoteInfoJson::from(note.as_ref()),
            resolution: kind,
            score: resolution.score(),
            alternatives,
        };

        let output = format!(
            "## Metadata\n```json\n{}\n```\n\n## Content\n{}",
            to_json(&info)?,
            content
        );

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// List notes in the vault with an optional tag filter
    #[tool(description = "List notes in the Obsidian vault, sorted by path, with an optional tag filter.")]
    async fn vault_list_notes(
        &self,
        params: Parameters<ListNotesParams>,
    ) -> Result<CallToolResult, McpError> {
        // Clamp limit: max 500 (DoS prevention)
        let limit = params.0.limit.clamp(1, 500);
        let notes: Vec<NoteInfoJson> = self
            .resolver
            .list(params.0.tag.as_deref(), limit)
            .iter()
            .map(|n| NoteInfoJson::from(n.as_ref()))
            .collect();

        Ok(CallToolResult::success(vec![Content::text(to_json(&notes)?)]))
    }

    /// Get index status
    #[tool(description = "Get vault index status: number of indexed notes, distinct tags, and time of the last full scan.")]
    async fn vault_status(&self) -> Result<CallToolResult, McpError> {
        let stats = self.resolver.stats();
        Ok(CallToolResult::success(vec![Content::text(to_json(&stats)?)]))
    }

    /// Rescan the vault
    #[tool(description = "Rescan the vault from disk and rebuild the note index. Returns counts of indexed, removed and failed notes.")]
    async fn vault_reindex(&self) -> Result<CallToolResult, McpError> {
        let stats = self.resolver.index_vault().map_err(|e| {
            McpError::internal_error(format!("Reindex failed: {}", e), None)
        })?;
        Ok(CallToolResult::success(vec![Content::text(to_json(&stats)?)]))
    }
}

#[rmcp::tool_handler]
impl ServerHandler for VaultService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Obsidian vault MCP server. Resolves approximate note names and searches titles, tags and content with fuzzy matching.".to_string()
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Run the MCP server
pub async fn run_mcp_server(vault_path: PathBuf, config: Config) -> Result<()> {
    use tokio::io::{stdin, stdout};

    let resolver = Arc::new(NoteResolver::new(vault_path.clone(), &config)?);
    let stats = resolver.index_vault()?;
    tracing::info!(
        "Serving vault {} ({} notes)",
        vault_path.display(),
        stats.indexed
    );

    #[cfg(feature = "watch")]
    let _watcher = super::watch::spawn_watcher(Arc::clone(&resolver))?;

    let service = VaultService::new(resolver);
    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
