//! CSS custom properties on a node's inline style.

use std::fmt::Display;

use memdom::{Document, NodeId};

use crate::action::Action;

/// Custom property values, keyed by name without the leading `--`.
///
/// An entry may be explicitly absent; absent entries are skipped when
/// applying, while falsy values such as `0` or `""` are still applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssVariables {
    entries: Vec<(String, Option<String>)>,
}

impl CssVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide a value for a variable.
    pub fn set(self, name: impl Into<String>, value: impl Display) -> Self {
        self.value(name, Some(value))
    }

    /// Name a variable without providing a value.
    pub fn unset(self, name: impl Into<String>) -> Self {
        self.value(name, None::<&str>)
    }

    pub fn value(mut self, name: impl Into<String>, value: Option<impl Display>) -> Self {
        let name = name.into();
        let value = value.map(|v| v.to_string());
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for CssVariables
where
    K: Into<String>,
    V: Display,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(CssVariables::new(), |vars, (name, value)| vars.value(name, value))
    }
}

/// Apply every provided variable as `--name: value`. Returns how many were set.
pub fn set_css_variables(doc: &mut Document, node: NodeId, variables: &CssVariables) -> usize {
    if !doc.exists(node) {
        log::debug!("css vars: {node} is not in the document");
        return 0;
    }

    let mut applied = 0;
    for (name, value) in variables.iter() {
        if let Some(value) = value {
            doc.set_style_property(node, format!("--{name}"), value);
            applied += 1;
        }
    }
    applied
}

/// Keeps a node's custom properties in sync with a variable set.
///
/// Updates are additive: variables missing from a later set keep the value
/// they were last given.
#[derive(Debug)]
pub struct CssVars {
    node: NodeId,
}

impl CssVars {
    pub fn attach(doc: &mut Document, node: NodeId, variables: CssVariables) -> Self {
        let applied = set_css_variables(doc, node, &variables);
        log::trace!("css vars: attached to {node}, {applied} applied");
        Self { node }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Action for CssVars {
    type Config = CssVariables;

    fn update(&mut self, doc: &mut Document, variables: CssVariables) {
        set_css_variables(doc, self.node, &variables);
    }

    /// Nothing to release: no listeners are registered and applied
    /// properties stay on the node.
    fn destroy(self, _doc: &mut Document) {}
}
