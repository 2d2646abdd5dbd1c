//! Inline style editing
//!
//! Reads and writes single declarations of an element's `style` attribute,
//! the equivalent of `element.style.<prop> = value`.

use crate::{DomTree, NodeId};

fn declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            if prop.is_empty() {
                return None;
            }
            Some((prop.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

impl DomTree {
    /// Value of one inline style property
    pub fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        let style = self.get_attribute(node, "style")?;
        declarations(style)
            .into_iter()
            .find(|(prop, _)| prop.eq_ignore_ascii_case(property))
            .map(|(_, value)| value)
    }

    /// Set one inline style property, keeping the others in place
    pub fn set_style_property(&mut self, node: NodeId, property: &str, value: &str) {
        let mut decls = self
            .get_attribute(node, "style")
            .map(declarations)
            .unwrap_or_default();
        let property = property.to_ascii_lowercase();

        match decls.iter_mut().find(|(prop, _)| *prop == property) {
            Some(decl) => decl.1 = value.to_string(),
            None => decls.push((property, value.to_string())),
        }

        let style = decls
            .iter()
            .map(|(prop, value)| format!("{prop}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attribute(node, "style", &style);
    }
}
