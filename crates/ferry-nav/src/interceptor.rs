//! Link interceptor
//!
//! Decides which clicks become in-page navigations. Anything it declines is
//! left to the native link behaviour, untouched.

use ferry_dom::{ClickEvent, Document, DomTree, MouseButton, NodeId};
use url::Url;

use crate::bridge::HistoryMode;
use crate::config::NavConfig;
use crate::location::Location;

/// A navigation the engine has taken over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub url: Url,
    pub mode: HistoryMode,
}

impl NavigationRequest {
    /// Navigation that adds a history entry
    pub fn push(url: Url) -> Self {
        Self {
            url,
            mode: HistoryMode::Push,
        }
    }

    /// Navigation that rewrites the current history entry
    pub fn replace(url: Url) -> Self {
        Self {
            url,
            mode: HistoryMode::Replace,
        }
    }
}

/// Nearest `a` element on an event path (target first)
pub fn find_anchor(tree: &DomTree, path: &[NodeId]) -> Option<NodeId> {
    path.iter()
        .copied()
        .take_while(|&id| id != NodeId::ROOT)
        .find(|&id| tree.is_element_named(id, "a"))
}

/// Click filter
#[derive(Debug, Clone)]
pub struct LinkInterceptor {
    opt_out_attribute: String,
    asset_extensions: Vec<String>,
}

impl LinkInterceptor {
    pub fn new(config: &NavConfig) -> Self {
        Self {
            opt_out_attribute: config.opt_out_attribute.clone(),
            asset_extensions: config.asset_extensions.clone(),
        }
    }

    /// Inspect a document-level click. On interception the event's default
    /// is prevented and the request to run is returned.
    pub fn intercept(
        &self,
        document: &Document,
        location: &Location,
        event: &mut ClickEvent,
    ) -> Option<NavigationRequest> {
        if event.modifiers.any() || event.button != MouseButton::Primary {
            return None;
        }

        let tree = document.tree();
        let anchor = find_anchor(tree, &event.composed_path(tree))?;

        if let Some(target) = tree.get_attribute(anchor, "target") {
            if !target.is_empty() && target != "_self" {
                return None;
            }
        }

        let href = tree.get_attribute(anchor, "href")?;
        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        let url = match location.resolve(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::trace!("Unresolvable href {:?}: {}", href, e);
                return None;
            }
        };
        if !location.is_same_origin(&url) || self.is_asset(&url) {
            return None;
        }
        if tree.has_attribute(anchor, &self.opt_out_attribute) {
            return None;
        }

        event.prevent_default();
        tracing::debug!("Intercepted click to {}", url);
        Some(NavigationRequest::push(url))
    }

    /// Whether the URL path names a non-document file
    pub fn is_asset(&self, url: &Url) -> bool {
        let Some(name) = url.path_segments().and_then(|mut segments| segments.next_back()) else {
            return false;
        };
        let Some((_, ext)) = name.rsplit_once('.') else {
            return false;
        };
        self.asset_extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }
}
