//! Ferry DOM - Document Object Model
//!
//! Arena-backed DOM tree used both for the live page shell and for the
//! inert documents parsed out of fetched markup.

mod document;
mod events;
mod interner;
mod node;
mod selector;
mod style;
mod tree;

pub use document::Document;
pub use events::{ClickEvent, Modifiers, MouseButton};
pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use selector::{Selector, SelectorError};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
