//! Prompt library for the extraction and advice backends
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/catat/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! This allows users to customize prompts without modifying the source,
//! while automatically getting new default prompts on upgrade.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::ExtractionSchema;

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const PARSE_TRANSACTION: &str = include_str!("../../../prompts/parse_transaction.md");
    pub const PARSE_TRANSACTIONS: &str = include_str!("../../../prompts/parse_transactions.md");
    pub const RECOMMEND: &str = include_str!("../../../prompts/recommend.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Single-transaction extraction
    ParseTransaction,
    /// Multi-transaction extraction
    ParseTransactions,
    /// Spending advice from a rendered summary
    Recommend,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseTransaction => "parse_transaction",
            Self::ParseTransactions => "parse_transactions",
            Self::Recommend => "recommend",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[
            Self::ParseTransaction,
            Self::ParseTransactions,
            Self::Recommend,
        ]
    }

    /// Extraction prompt for the requested response shape
    pub fn for_schema(schema: ExtractionSchema) -> Self {
        match schema {
            ExtractionSchema::Single => Self::ParseTransaction,
            ExtractionSchema::Multi => Self::ParseTransactions,
        }
    }

    /// Get the default embedded content for this prompt
    pub fn default_content(&self) -> &'static str {
        match self {
            Self::ParseTransaction => defaults::PARSE_TRANSACTION,
            Self::ParseTransactions => defaults::PARSE_TRANSACTIONS,
            Self::Recommend => defaults::RECOMMEND,
        }
    }
}

impl std::str::FromStr for PromptId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .find(|id| id.as_str() == s.trim())
            .copied()
            .ok_or_else(|| Error::InvalidData(format!("Unknown prompt id: {}", s)))
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    /// Unique identifier
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
    /// Kind of work the prompt asks for (structured_extraction, narrative)
    pub task_type: String,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Metadata from frontmatter
    pub metadata: PromptMetadata,
    /// The prompt content (system + user sections)
    pub content: String,
    /// Whether this came from an override file
    pub is_override: bool,
    /// Path to override file (if any)
    pub override_path: Option<PathBuf>,
}

/// System and user text ready to send to a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: Option<String>,
    pub user: String,
}

impl Prompt {
    /// Get the system section of the prompt
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    /// Get the user section of the prompt
    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the prompt with template variables replaced
    pub fn render(&self, vars: &HashMap<&str, &str>) -> String {
        substitute(&self.content, vars)
    }

    /// Render just the system section with variables
    pub fn render_system(&self, vars: &HashMap<&str, &str>) -> Option<String> {
        self.system_section().map(|system| substitute(system, vars))
    }

    /// Render just the user section with variables
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        match self.user_section() {
            Some(user) => substitute(user, vars),
            None => self.render(vars),
        }
    }

    /// Render both sections for a chat-style request
    pub fn render_pair(&self, vars: &HashMap<&str, &str>) -> RenderedPrompt {
        RenderedPrompt {
            system: self.render_system(vars),
            user: self.render_user(vars),
        }
    }
}

/// Simple mustache-style replacement: `{{var}}` plus `{{#if var}}...{{/if}}`
fn substitute(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let pattern = format!("{{{{{}}}}}", key);
        result = result.replace(&pattern, value);
    }
    remove_unmatched_conditionals(&result, vars)
}

/// Prompt library for loading and caching prompts
pub struct PromptLibrary {
    /// Override directory path
    override_dir: Option<PathBuf>,
    /// Cached parsed prompts
    cache: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Create a new prompt library with default paths
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with a custom override directory
    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Get a prompt by ID, loading from override or default
    pub fn get(&mut self, id: PromptId) -> Result<&Prompt> {
        match self.cache.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let prompt = load(self.override_dir.as_deref(), id)?;
                Ok(entry.insert(prompt))
            }
        }
    }

    /// Render a prompt's sections in one step
    pub fn render(&mut self, id: PromptId, vars: &HashMap<&str, &str>) -> Result<RenderedPrompt> {
        Ok(self.get(id)?.render_pair(vars))
    }

    /// List all prompts with their override status
    pub fn list(&mut self) -> Vec<PromptInfo> {
        PromptId::all()
            .iter()
            .map(|&id| {
                let override_path = self.override_path(id).filter(|p| p.exists());
                let prompt = self.get(id).ok();
                PromptInfo {
                    id: id.as_str().to_string(),
                    version: prompt.map(|p| p.metadata.version).unwrap_or(0),
                    task_type: prompt
                        .map(|p| p.metadata.task_type.clone())
                        .unwrap_or_default(),
                    has_override: override_path.is_some(),
                    override_path,
                }
            })
            .collect()
    }

    /// Check if a prompt has an override file
    pub fn has_override(&self, id: PromptId) -> bool {
        self.override_path(id).is_some_and(|p| p.exists())
    }

    /// Where an override for `id` would live
    pub fn override_path(&self, id: PromptId) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|d| d.join(format!("{}.md", id.as_str())))
    }

    /// Get the override directory path
    pub fn override_dir(&self) -> Option<&PathBuf> {
        self.override_dir.as_ref()
    }

    /// Clear the cache (useful after editing override files)
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a prompt (checking override first, then default)
fn load(override_dir: Option<&Path>, id: PromptId) -> Result<Prompt> {
    if let Some(override_dir) = override_dir {
        let override_path = override_dir.join(format!("{}.md", id.as_str()));
        if override_path.exists() {
            let content = fs::read_to_string(&override_path).map_err(|e| {
                Error::InvalidData(format!("Failed to read prompt override: {}", e))
            })?;
            let (metadata, body) = parse_prompt(&content)?;
            return Ok(Prompt {
                metadata,
                content: body,
                is_override: true,
                override_path: Some(override_path),
            });
        }
    }

    let (metadata, body) = parse_prompt(id.default_content())?;
    Ok(Prompt {
        metadata,
        content: body,
        is_override: false,
        override_path: None,
    })
}

/// Information about a prompt for listing
#[derive(Debug, Clone)]
pub struct PromptInfo {
    /// Prompt identifier
    pub id: String,
    /// Version from metadata
    pub version: u32,
    /// Task type from metadata
    pub task_type: String,
    /// Whether an override exists
    pub has_override: bool,
    /// Path to override file (if exists)
    pub override_path: Option<PathBuf>,
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("catat").join("prompts").join("overrides"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    // Check for YAML frontmatter
    if !content.starts_with("---") {
        return Err(Error::InvalidData(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    // Find end of frontmatter
    let rest = &content[3..];
    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = &rest[..end].trim();
    let body = &rest[end + 3..].trim();

    // Parse frontmatter as YAML
    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];

    // Find the next header or end of content
    let end = after_header.find("\n# ").unwrap_or(after_header.len());

    Some(after_header[..end].trim())
}

/// Remove unmatched conditional blocks from the template
fn remove_unmatched_conditionals(content: &str, vars: &HashMap<&str, &str>) -> String {
    let mut result = content.to_string();

    // Find all {{#if var}}...{{/if}} blocks
    loop {
        if let Some(if_start) = result.find("{{#if ") {
            let var_start = if_start + 6;
            if let Some(var_end) = result[var_start..].find("}}") {
                let var_name = &result[var_start..var_start + var_end];
                let block_start = var_start + var_end + 2;

                // Find matching {{/if}}
                if let Some(endif_pos) = result[block_start..].find("{{/if}}") {
                    let block_content = &result[block_start..block_start + endif_pos];
                    let full_end = block_start + endif_pos + 7;

                    // Check if variable is present and non-empty
                    let should_include = vars.get(var_name).is_some_and(|v| !v.is_empty());

                    if should_include {
                        // Keep block content, remove markers
                        result = format!(
                            "{}{}{}",
                            &result[..if_start],
                            block_content,
                            &result[full_end..]
                        );
                    } else {
                        // Remove entire block
                        result = format!("{}{}", &result[..if_start], &result[full_end..]);
                    }
                    continue;
                }
            }
        }
        break;
    }

    result
}
