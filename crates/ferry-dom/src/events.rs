//! DOM Events
//!
//! Pointer click events as seen by document-level listeners.

use crate::{DomTree, NodeId};

/// Mouse button that triggered a click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    /// Usually the left button (`event.button === 0`)
    #[default]
    Primary,
    /// Usually the wheel button
    Auxiliary,
    /// Usually the right button
    Secondary,
    Other(u16),
}

impl From<u16> for MouseButton {
    fn from(button: u16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }
}

/// Keyboard modifiers held during the click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held
    pub const NONE: Modifiers = Modifiers {
        meta: false,
        ctrl: false,
        shift: false,
        alt: false,
    };

    /// Check whether any modifier is held
    pub fn any(&self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt
    }
}

/// Click event
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub target: NodeId,
    pub button: MouseButton,
    pub modifiers: Modifiers,
    pub cancelable: bool,
    default_prevented: bool,
}

impl ClickEvent {
    /// Unmodified primary-button click on `target`
    pub fn primary(target: NodeId) -> Self {
        Self {
            target,
            button: MouseButton::Primary,
            modifiers: Modifiers::NONE,
            cancelable: true,
            default_prevented: false,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Target followed by its ancestors, ending at the document node
    pub fn composed_path(&self, tree: &DomTree) -> Vec<NodeId> {
        if !tree.contains(self.target) {
            return Vec::new();
        }
        std::iter::once(self.target)
            .chain(tree.ancestors(self.target))
            .collect()
    }
}
