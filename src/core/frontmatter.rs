use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    static ref FRONTMATTER_RE: Regex = Regex::new(r"(?s)^---\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|$)").unwrap();
}

/// Fields of the YAML front-matter block used for matching
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub aliases: Vec<String>,
    pub raw: String,
}

/// Obsidian accepts both `tags: [a, b]` and `tags: a b` / `tags: a, b`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<serde_yaml::Value>),
}

impl StringOrList {
    fn into_vec(self, split_on_whitespace: bool) -> Vec<String> {
        match self {
            Self::One(s) => s
                .split(|c: char| c == ',' || (split_on_whitespace && c.is_whitespace()))
                .map(str::to_string)
                .collect(),
            Self::Many(values) => values
                .into_iter()
                .filter_map(|v| match v {
                    serde_yaml::Value::String(s) => Some(s),
                    serde_yaml::Value::Number(n) => Some(n.to_string()),
                    serde_yaml::Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawFrontmatter {
    title: Option<String>,
    tags: Option<StringOrList>,
    tag: Option<StringOrList>,
    aliases: Option<StringOrList>,
}

impl Frontmatter {
    /// Parse the leading `---` block.
    ///
    /// Returns `None` when there is no block or its YAML is malformed.
    pub fn parse(content: &str) -> Option<Self> {
        let caps = FRONTMATTER_RE.captures(content)?;
        let raw = caps.get(1)?.as_str().to_string();

        let parsed: RawFrontmatter = if raw.trim().is_empty() {
            RawFrontmatter::default()
        } else {
            match serde_yaml::from_str(&raw) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::debug!("Ignoring malformed front-matter: {}", e);
                    return None;
                }
            }
        };

        let title = parsed
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let tags = parsed
            .tags
            .into_iter()
            .chain(parsed.tag)
            .flat_map(|t| t.into_vec(true))
            .map(|t| t.trim().trim_start_matches('#').to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let aliases = parsed
            .aliases
            .map(|a| a.into_vec(false))
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        Some(Self {
            title,
            tags,
            aliases,
            raw,
        })
    }

    /// Byte offset where the note body starts
    pub fn body_offset(content: &str) -> usize {
        FRONTMATTER_RE
            .find(content)
            .map(|m| m.end())
            .unwrap_or(0)
    }
}
