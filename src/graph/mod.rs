use std::collections::{HashMap, HashSet};

use crate::core::unit::{NodeId, UnitNode};

pub mod builder;
pub mod expr;
pub mod traverse;
pub mod viz;

/// Registry of unit nodes keyed by name. Names the metadata provider could
/// not find are remembered separately so they are looked up only once.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<UnitNode>,
    index: HashMap<String, NodeId>,
    missing: HashSet<String>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> &UnitNode {
        &self.nodes[id.index()]
    }

    pub fn node_by_name(&self, name: &str) -> Option<&UnitNode> {
        self.id_of(name).map(|id| self.node(id))
    }

    pub fn is_missing(&self, name: &str) -> bool {
        self.missing.contains(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut UnitNode {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn insert(&mut self, node: UnitNode) -> NodeId {
        if let Some(existing) = self.id_of(&node.name) {
            return existing;
        }
        let id = NodeId::new(self.nodes.len());
        self.index.insert(node.name.clone(), id);
        self.nodes.push(node);
        id
    }

    pub(crate) fn mark_missing(&mut self, name: &str) {
        self.missing.insert(name.to_string());
    }
}
