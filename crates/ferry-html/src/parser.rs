//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into a `ferry_dom::Document`.

use ferry_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty(url);
        let root = document.tree().root();
        self.convert_node(&dom.document, document.tree_mut(), root);
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Convert an RcDom node and everything below it into our tree under
    /// `parent`. Uses an explicit work stack, so deep nesting cannot
    /// exhaust the call stack.
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        let mut stack: Vec<(Handle, NodeId)> = vec![(handle.clone(), parent)];

        while let Some((handle, parent)) = stack.pop() {
            let id = match &handle.data {
                RcNodeData::Document => parent,
                RcNodeData::Doctype { name, public_id, system_id } => {
                    tree.create_doctype(name, public_id, system_id)
                }
                RcNodeData::Text { contents } => tree.create_text(&contents.borrow()),
                RcNodeData::Comment { contents } => tree.create_comment(contents),
                RcNodeData::Element { name, attrs, .. } => {
                    let id = tree.create_element(&name.local);
                    for attr in attrs.borrow().iter() {
                        tree.set_attribute(id, &attr.name.local, &attr.value);
                    }
                    id
                }
                RcNodeData::ProcessingInstruction { .. } => continue,
            };
            if id != parent {
                tree.append_child(parent, id);
            }

            // Reversed so children come off the stack in document order
            let children = handle.children.borrow();
            stack.extend(children.iter().rev().map(|child| (child.clone(), id)));
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}
