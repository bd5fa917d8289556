//! Segment trie used to resolve paths to handlers.
//!
//! # Matching
//! - One node per path segment, children keyed by literal segment text
//! - A placeholder segment (`:name`) is stored as an ordinary child keyed by
//!   its own text; the parent additionally records it as its parameter child
//! - Lookup prefers the literal child and falls back to the parameter child
//! - A path matches only if every segment is consumed and the final node
//!   carries a value

use std::collections::HashMap;

use crate::error::MuxError;
use crate::routing::params::Params;
use crate::routing::segment::Segments;

/// Leading character of a placeholder segment.
pub const PARAM_MARKER: char = ':';

/// Returns true if `segment` is a placeholder.
pub fn is_param(segment: &str) -> bool {
    segment.starts_with(PARAM_MARKER)
}

/// A trie node. The root is the whole tree.
#[derive(Debug)]
pub struct Node<V> {
    value: Option<V>,
    param: Option<String>,
    children: HashMap<String, Node<V>>,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self {
            value: None,
            param: None,
            children: HashMap::new(),
        }
    }
}

impl<V> Node<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` at the node reached by `pattern`.
    ///
    /// Returns `true` if no value was bound there before. Errors leave the
    /// tree untouched.
    pub fn insert(&mut self, pattern: &str, value: V) -> Result<bool, MuxError> {
        self.check(pattern)?;

        let mut node = self;
        for segment in Segments::new(pattern) {
            if is_param(segment) && node.param.is_none() {
                node.param = Some(segment.to_string());
            }
            node = node.children.entry(segment.to_string()).or_default();
        }

        Ok(node.value.replace(value).is_none())
    }

    /// Value bound to exactly `path`.
    pub fn get(&self, path: &str) -> Option<&V> {
        let mut node = self;
        for segment in Segments::new(path) {
            node = node.select(segment)?.0;
        }
        node.value.as_ref()
    }

    /// Like [`get`](Self::get), also collecting every placeholder capture.
    ///
    /// The returned params are empty when nothing matched.
    pub fn get_with_params(&self, path: &str) -> (Option<&V>, Params) {
        let mut params = Params::new();
        let mut node = self;
        for segment in Segments::new(path) {
            let Some((child, via_param)) = node.select(segment) else {
                return (None, Params::new());
            };
            if let Some(name) = node.param_name().filter(|_| via_param) {
                params.insert(name, segment);
            }
            node = child;
        }

        match node.value.as_ref() {
            Some(value) => (Some(value), params),
            None => (None, Params::new()),
        }
    }

    /// Name reported for captures through this node's parameter child.
    pub fn param_name(&self) -> Option<&str> {
        self.param
            .as_deref()
            .and_then(|p| p.strip_prefix(PARAM_MARKER))
    }

    fn select(&self, segment: &str) -> Option<(&Node<V>, bool)> {
        if let Some(child) = self.children.get(segment) {
            return Some((child, false));
        }
        let param = self.param.as_deref()?;
        self.children.get(param).map(|child| (child, true))
    }

    /// Reports the error `insert` would return for `pattern`, without
    /// touching the tree.
    // Conflicts can only occur along nodes that already exist, so walking
    // them once up front keeps `insert` all-or-nothing.
    pub fn check(&self, pattern: &str) -> Result<(), MuxError> {
        let mut node = Some(self);
        for segment in Segments::new(pattern) {
            if segment.len() == PARAM_MARKER.len_utf8() && is_param(segment) {
                return Err(MuxError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: "placeholder has no name",
                });
            }

            let Some(current) = node else { continue };
            if is_param(segment) {
                if let Some(existing) = current.param.as_deref().filter(|p| *p != segment) {
                    return Err(MuxError::ParamConflict {
                        pattern: pattern.to_string(),
                        existing: existing.to_string(),
                        placeholder: segment.to_string(),
                    });
                }
            }
            node = current.children.get(segment);
        }
        Ok(())
    }
}
