//! Element selectors
//!
//! The subset of CSS selectors the navigation engine needs: selector lists,
//! descendant combinators, and compound selectors built from a tag (or `*`),
//! `#id`, `.class` and `[attr]` / `[attr=value]`.

use crate::{DomTree, NodeId};

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character {found:?} in selector {selector:?}")]
    Unexpected { selector: String, found: char },

    #[error("unsupported combinator {0:?}")]
    UnsupportedCombinator(char),
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

/// Compound selectors joined by descendant combinators; the last one is
/// the subject
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Selector {
    /// Parse a selector list such as `nav a, .site-nav a`
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        for alt in source.split(',') {
            let alt = alt.trim();
            if alt.is_empty() {
                return Err(SelectorError::Empty);
            }
            let parts = alt
                .split_whitespace()
                .map(|part| Compound::parse(part, source))
                .collect::<Result<Vec<_>, _>>()?;
            alternatives.push(Complex { parts });
        }
        Ok(Self { alternatives })
    }

    /// Check whether an element matches any alternative
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(tree, node))
    }

    /// First matching element below `scope` in document order
    pub fn query_first(&self, tree: &DomTree, scope: NodeId) -> Option<NodeId> {
        tree.descendants(scope)
            .into_iter()
            .find(|&id| self.matches(tree, id))
    }

    /// Every matching element below `scope` in document order
    pub fn query_all(&self, tree: &DomTree, scope: NodeId) -> Vec<NodeId> {
        tree.descendants(scope)
            .into_iter()
            .filter(|&id| self.matches(tree, id))
            .collect()
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Complex {
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some((subject, rest)) = self.parts.split_last() else {
            return false;
        };
        if !subject.matches(tree, node) {
            return false;
        }

        // Descendant combinators only, so a greedy nearest-ancestor walk
        // finds a match whenever one exists.
        let mut ancestors = tree.ancestors(node);
        rest.iter()
            .rev()
            .all(|part| ancestors.any(|a| part.matches(tree, a)))
    }
}

impl Compound {
    fn parse(part: &str, selector: &str) -> Result<Self, SelectorError> {
        let mut compound = Compound::default();
        let mut chars = part.chars().peekable();

        let take_ident = |chars: &mut std::iter::Peekable<std::str::Chars<'_>>| {
            let mut ident = String::new();
            while let Some(&c) = chars.peek() {
                if !is_ident_char(c) {
                    break;
                }
                ident.push(c);
                chars.next();
            }
            ident
        };

        if chars.peek() == Some(&'*') {
            chars.next();
        } else {
            let tag = take_ident(&mut chars);
            if !tag.is_empty() {
                compound.tag = Some(tag.to_ascii_lowercase());
            }
        }

        while let Some(c) = chars.next() {
            match c {
                '#' | '.' => {
                    let ident = take_ident(&mut chars);
                    if ident.is_empty() {
                        return Err(SelectorError::Unexpected {
                            selector: selector.to_string(),
                            found: c,
                        });
                    }
                    if c == '#' {
                        compound.id = Some(ident);
                    } else {
                        compound.classes.push(ident);
                    }
                }
                '[' => {
                    let body: String = chars.by_ref().take_while(|&c| c != ']').collect();
                    let attr = match body.split_once('=') {
                        Some((name, value)) => {
                            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                            (name.trim().to_ascii_lowercase(), Some(value.to_string()))
                        }
                        None => (body.trim().to_ascii_lowercase(), None),
                    };
                    if attr.0.is_empty() || !attr.0.chars().all(is_ident_char) {
                        return Err(SelectorError::Unexpected {
                            selector: selector.to_string(),
                            found: '[',
                        });
                    }
                    compound.attrs.push(attr);
                }
                '>' | '+' | '~' => return Err(SelectorError::UnsupportedCombinator(c)),
                other => {
                    return Err(SelectorError::Unexpected {
                        selector: selector.to_string(),
                        found: other,
                    });
                }
            }
        }

        Ok(compound)
    }

    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(tag) = tree.tag_name(node) else {
            return false;
        };
        if let Some(want) = &self.tag {
            if tag != want {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if tree.get_attribute(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| tree.has_class(node, class)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| {
            match (tree.get_attribute(node, name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            }
        })
    }
}
