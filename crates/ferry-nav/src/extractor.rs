//! Content extractor
//!
//! Parses fetched markup inertly and pulls out what a swap needs: the
//! content region, the title and the scripts to run afterwards.

use ferry_dom::{Document, NodeId, Selector};

use crate::config::NavConfig;
use crate::error::NavError;

/// A script found in the new content region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptDirective {
    Inline { code: String },
    /// `src` as written in the markup, unresolved
    External { src: String },
}

/// Parsed destination page
#[derive(Debug)]
pub struct ExtractedPage {
    pub document: Document,
    /// Content region inside `document`
    pub region: NodeId,
    /// Non-empty `<title>` text
    pub title: Option<String>,
    /// Scripts inside the region, in document order
    pub scripts: Vec<ScriptDirective>,
}

impl ExtractedPage {
    /// Text of the new content region
    pub fn region_text(&self) -> String {
        self.document.tree().text_content(self.region)
    }
}

/// Result of extracting a fetched page
#[derive(Debug)]
pub enum Extraction {
    Page(ExtractedPage),
    /// The markup parsed but holds no content region
    NoContentRegion,
}

impl Extraction {
    pub fn page(&self) -> Option<&ExtractedPage> {
        match self {
            Self::Page(page) => Some(page),
            Self::NoContentRegion => None,
        }
    }
}

/// Extracts content regions with a fixed selector
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    selector: Selector,
    source: String,
}

impl ContentExtractor {
    pub fn new(config: &NavConfig) -> Result<Self, NavError> {
        Ok(Self {
            selector: Selector::parse(&config.content_selector)?,
            source: config.content_selector.clone(),
        })
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Content-region selector as configured
    pub fn selector_source(&self) -> &str {
        &self.source
    }

    /// Parse `markup` and extract the content region. Never runs scripts.
    pub fn extract(&self, markup: &str) -> Extraction {
        let document = ferry_html::parse(markup);
        let Some(region) = document.query_selector(&self.selector) else {
            tracing::debug!("No element matches {} in fetched page", self.source);
            return Extraction::NoContentRegion;
        };

        let title = document.title().filter(|t| !t.is_empty());
        let scripts = collect_scripts(&document, region);
        tracing::debug!(
            "Extracted region ({} nodes, {} scripts)",
            document.tree().descendants(region).len(),
            scripts.len()
        );

        Extraction::Page(ExtractedPage {
            document,
            region,
            title,
            scripts,
        })
    }
}

fn collect_scripts(document: &Document, region: NodeId) -> Vec<ScriptDirective> {
    let tree = document.tree();
    tree.descendants(region)
        .into_iter()
        .filter(|&id| tree.is_element_named(id, "script"))
        .map(|id| match tree.get_attribute(id, "src") {
            Some(src) if !src.is_empty() => ScriptDirective::External {
                src: src.to_string(),
            },
            _ => ScriptDirective::Inline {
                code: tree.text_content(id),
            },
        })
        .collect()
}
