//! The tool catalog
//!
//! An external Markdown document lists every known tool as a table row
//! tagged with the `<!--tool-->` sentinel. Rows carry a tool-name link,
//! a description, and optionally the `<!--test-->` marker enabling the
//! tool's test gate. The catalog is consumed, never written.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

/// File name of the catalog at the workspace root.
pub const CATALOG_FILE: &str = "CATALOG.md";

/// Sentinel marking a catalog entry line.
const ENTRY_MARKER: &str = "<!--tool-->";

/// Marker enabling the `test` action for a tool.
const TEST_MARKER: &str = "<!--test-->";

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid link pattern"));

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--.*?-->").expect("valid comment pattern"));

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Tool name from the first Markdown link.
    pub name: String,
    /// The row with comment annotations stripped.
    pub line: String,
    /// Whether the row carries the test-enabled marker.
    pub test_enabled: bool,
}

/// Parsed catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Load the catalog from a file. A missing file yields an empty
    /// catalog: search finds nothing and no tool is test-enabled.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no catalog file, using empty catalog");
            return Ok(Self::default());
        }
        let content = armory_fs::read_text(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse catalog content, keeping only sentinel-marked lines.
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .filter(|line| line.contains(ENTRY_MARKER))
            .filter_map(|line| {
                let test_enabled = line.contains(TEST_MARKER);
                let stripped = COMMENT.replace_all(line, "").trim().to_string();
                let name = LINK.captures(&stripped)?.get(1)?.as_str().to_string();
                Some(CatalogEntry {
                    name,
                    line: stripped,
                    test_enabled,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Case-insensitive substring search over the stripped entry line, so
    /// both the name and the description columns match.
    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.line.to_lowercase().contains(&needle))
            .collect()
    }

    /// Whether the catalog marks a tool as test-enabled.
    pub fn test_enabled(&self, tool: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.name == tool && e.test_enabled)
    }
}
