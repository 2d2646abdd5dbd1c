//! Document - High-level document API

use crate::{DomTree, NodeId, Selector};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate the html, head and body elements after the tree was built
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let find_child = |parent: NodeId, tag: &str| {
            tree.children(parent)
                .map(|(id, _)| id)
                .find(|&id| tree.is_element_named(id, tag))
                .unwrap_or(NodeId::NONE)
        };

        let html = find_child(tree.root(), "html");
        let (head, body) = if html.is_valid() {
            (find_child(html, "head"), find_child(html, "body"))
        } else {
            (NodeId::NONE, NodeId::NONE)
        };

        if !body.is_valid() {
            tracing::debug!(url = %self.url, "document has no <body>");
        }

        self.html_element = html;
        self.head_element = head;
        self.body_element = body;
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Text of the first <title> element, if any
    pub fn title(&self) -> Option<String> {
        let title = self.first_element_named("title")?;
        Some(self.tree.text_content(title))
    }

    /// Set the document title, creating <title> in <head> when missing
    pub fn set_title(&mut self, title: &str) {
        let node = match self.first_element_named("title") {
            Some(node) => node,
            None => {
                let parent = if self.head_element.is_valid() {
                    self.head_element
                } else {
                    self.tree.root()
                };
                let node = self.tree.create_element("title");
                self.tree.append_child(parent, node);
                node
            }
        };
        self.tree.set_text_content(node, title);
    }

    fn first_element_named(&self, tag: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&id| self.tree.is_element_named(id, tag))
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&node| self.tree.get_attribute(node, "id") == Some(id))
    }

    /// First element matching `selector` in document order
    pub fn query_selector(&self, selector: &Selector) -> Option<NodeId> {
        selector.query_first(&self.tree, self.tree.root())
    }

    /// Every element matching `selector` in document order
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        selector.query_all(&self.tree, self.tree.root())
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}
