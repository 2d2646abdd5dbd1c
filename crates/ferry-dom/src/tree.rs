//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: detaching a subtree only unlinks it, which keeps
//! every `NodeId` handed out stable for the lifetime of the tree.

use crate::{InternedString, Node, NodeData, NodeId, StringInterner};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            interner: StringInterner::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Check whether `id` refers to a node of this tree
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.is_valid() && id.index() < self.nodes.len()
    }

    /// Number of nodes ever allocated, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.get(id)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(&tag.to_ascii_lowercase());
        self.push(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text.to_string()))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::doctype(
            name.to_string(),
            public_id.to_string(),
            system_id.to_string(),
        ))
    }

    /// Append `child` as the last child of `parent`, moving it out of its
    /// current position first. Returns false when the move would create a
    /// cycle or either ID is foreign to this tree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) || child == NodeId::ROOT {
            return false;
        }
        // A childless node can only be its own ancestor
        let has_children = self.nodes[child.index()].first_child.is_valid();
        if parent == child || (has_children && self.ancestors(parent).any(|a| a == child)) {
            return false;
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        true
    }

    /// Unlink a node (and its subtree) from its parent
    pub fn detach(&mut self, node: NodeId) {
        if !self.contains(node) {
            return;
        }
        let (parent, prev, next) = {
            let n = &self.nodes[node.index()];
            (n.parent, n.prev_sibling, n.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let n = &mut self.nodes[node.index()];
        n.parent = NodeId::NONE;
        n.prev_sibling = NodeId::NONE;
        n.next_sibling = NodeId::NONE;
    }

    /// Detach every child of `parent`, returning how many were removed
    pub fn remove_children(&mut self, parent: NodeId) -> usize {
        let children = self.child_ids(parent);
        for child in &children {
            self.detach(*child);
        }
        children.len()
    }

    /// Parent of a node, if attached
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Iterate over direct children
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(parent).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Direct child IDs, collected
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).map(|(id, _)| id).collect()
    }

    /// Iterate over the ancestors of a node, nearest first, ending at the
    /// document node when the node is attached
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(node).unwrap_or(NodeId::NONE),
        }
    }

    /// All nodes below `node` in document (pre-)order, excluding `node`
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_ids(node).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut kids = self.child_ids(id);
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    /// Check whether `node` lies inside the subtree rooted at `ancestor`
    pub fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        let elem = self.get(node)?.as_element()?;
        Some(self.resolve(elem.name))
    }

    /// Check whether `node` is an element with the given tag
    pub fn is_element_named(&self, node: NodeId, tag: &str) -> bool {
        self.tag_name(node)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    /// Get an attribute value
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        let name = self.interner.lookup(name)?;
        self.get(node)?.as_element()?.get_attr(name)
    }

    /// Check whether an attribute is present
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    /// Set an attribute. Returns false if `node` is not an element.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        if !self.get(node).is_some_and(Node::is_element) {
            return false;
        }
        let name = self.interner.intern(name);
        match self.get_mut(node).and_then(Node::as_element_mut) {
            Some(elem) => {
                elem.set_attr(name, value.to_string());
                true
            }
            None => false,
        }
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<String> {
        let name = self.interner.lookup(name)?;
        self.get_mut(node)?.as_element_mut()?.remove_attr(name)
    }

    /// Check the class list of an element
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get_attribute(node, "class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    /// Add or remove a class depending on `on`
    pub fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        let mut classes: Vec<String> = self
            .get_attribute(node, "class")
            .map(|list| list.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let present = classes.iter().any(|c| c == class);

        match (on, present) {
            (true, false) => classes.push(class.to_string()),
            (false, true) => classes.retain(|c| c != class),
            _ => return,
        }

        if classes.is_empty() {
            self.remove_attribute(node, "class");
        } else {
            self.set_attribute(node, "class", &classes.join(" "));
        }
    }

    /// Concatenated text of every text node below `node`
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.get(node).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(node)
            .into_iter()
            .filter_map(|id| self.get(id).and_then(Node::as_text))
            .collect()
    }

    /// Replace all children of `node` with a single text node
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        self.remove_children(node);
        if !text.is_empty() {
            let child = self.create_text(text);
            self.append_child(node, child);
        }
    }

    /// Deep-copy `node` from another tree into this one. The copy is
    /// detached; names are re-interned since interners are per tree.
    /// Walks with an explicit stack, so nesting depth is unbounded.
    pub fn import_subtree(&mut self, source: &DomTree, node: NodeId) -> NodeId {
        let copy = self.import_node(source, node);
        if !copy.is_valid() {
            return NodeId::NONE;
        }

        // (source node, copy of its parent)
        let mut stack: Vec<(NodeId, NodeId)> = source
            .child_ids(node)
            .into_iter()
            .rev()
            .map(|child| (child, copy))
            .collect();
        while let Some((src, parent)) = stack.pop() {
            let imported = self.import_node(source, src);
            if !imported.is_valid() {
                continue;
            }
            self.append_child(parent, imported);
            stack.extend(
                source
                    .child_ids(src)
                    .into_iter()
                    .rev()
                    .map(|child| (child, imported)),
            );
        }
        copy
    }

    /// Copy a single node, without children
    fn import_node(&mut self, source: &DomTree, node: NodeId) -> NodeId {
        let Some(src) = source.get(node) else {
            return NodeId::NONE;
        };
        match &src.data {
            NodeData::Element(elem) => {
                let id = self.create_element(source.resolve(elem.name));
                for attr in &elem.attrs {
                    self.set_attribute(id, source.resolve(attr.name), &attr.value);
                }
                id
            }
            NodeData::Text(text) => self.create_text(text),
            NodeData::Comment(text) => self.create_comment(text),
            NodeData::Doctype { name, public_id, system_id } => {
                self.create_doctype(name, public_id, system_id)
            }
            NodeData::Document => NodeId::NONE,
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Iterator over the ancestors of a node
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.parent;
        Some(id)
    }
}
