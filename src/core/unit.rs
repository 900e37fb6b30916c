use std::collections::HashMap;

use serde::Serialize;

/// Index of a node inside a [`crate::graph::DependencyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Target of a dependency edge. Names the provider has no record of stay in
/// the map so they are still listed, but they have no node to descend into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyRef {
    Resolved(NodeId),
    Unresolved,
}

impl DependencyRef {
    pub fn node(self) -> Option<NodeId> {
        match self {
            DependencyRef::Resolved(id) => Some(id),
            DependencyRef::Unresolved => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnitNode {
    pub name: String,
    pub version: Option<String>,
    pub source_group: Option<String>,
    pub source_version: Option<String>,
    pub dependencies: HashMap<String, DependencyRef>,
}

impl UnitNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            source_group: None,
            source_version: None,
            dependencies: HashMap::new(),
        }
    }

    /// First write wins; a later edge with the same name is ignored.
    pub fn add_dependency(&mut self, name: impl Into<String>, target: DependencyRef) {
        self.dependencies.entry(name.into()).or_insert(target);
    }

    pub fn sorted_dependency_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.dependencies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The source group this unit is built from, defaulting to its own name.
    pub fn source_group_or_name(&self) -> &str {
        self.source_group
            .as_deref()
            .filter(|group| !group.is_empty())
            .unwrap_or(&self.name)
    }

    /// Version to request when fetching this unit's source group.
    pub fn source_version_or_version(&self) -> Option<&str> {
        self.source_version
            .as_deref()
            .or(self.version.as_deref())
            .filter(|version| !version.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTarget {
    pub name: String,
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use crate::core::unit::{DependencyRef, NodeId, UnitNode};

    #[test]
    fn first_dependency_write_wins() {
        let mut node = UnitNode::new("app");
        node.add_dependency("libc6", DependencyRef::Resolved(NodeId::new(1)));
        node.add_dependency("libc6", DependencyRef::Unresolved);
        assert_eq!(
            node.dependencies.get("libc6"),
            Some(&DependencyRef::Resolved(NodeId::new(1)))
        );
    }

    #[test]
    fn source_group_defaults_to_unit_name() {
        let mut node = UnitNode::new("libfoo1");
        assert_eq!(node.source_group_or_name(), "libfoo1");
        node.source_group = Some(String::new());
        assert_eq!(node.source_group_or_name(), "libfoo1");
        node.source_group = Some("foo".to_string());
        assert_eq!(node.source_group_or_name(), "foo");
    }

    #[test]
    fn source_version_prefers_source_field() {
        let mut node = UnitNode::new("libfoo1");
        node.version = Some("1.0-1+b2".to_string());
        assert_eq!(node.source_version_or_version(), Some("1.0-1+b2"));
        node.source_version = Some("1.0-1".to_string());
        assert_eq!(node.source_version_or_version(), Some("1.0-1"));
    }
}
