use tracing::{debug, warn};

use crate::core::unit::{DependencyRef, NodeId, UnitNode};
use crate::graph::expr::parse_dependency_expression;
use crate::graph::DependencyGraph;
use crate::metadata::{MetadataError, MetadataProvider};

/// Lazily builds and memoizes unit nodes from a metadata provider.
///
/// A node is registered before its dependencies are expanded, so cycles and
/// self-dependencies terminate: the second visit finds the node already in
/// the registry.
pub struct GraphBuilder<P> {
    provider: P,
    fields: Vec<String>,
    graph: DependencyGraph,
}

impl<P: MetadataProvider> GraphBuilder<P> {
    pub fn new(provider: P) -> Self {
        Self::with_fields(provider, vec!["Depends".to_string()])
    }

    pub fn with_fields(provider: P, fields: Vec<String>) -> Self {
        Self {
            provider,
            fields,
            graph: DependencyGraph::new(),
        }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the node for `name`, building it and every transitive
    /// dependency on first request. `None` means the provider has no record
    /// of the unit.
    pub fn resolve_node(&mut self, name: &str) -> Option<NodeId> {
        if let Some(id) = self.graph.id_of(name) {
            return Some(id);
        }
        if self.graph.is_missing(name) {
            return None;
        }

        let (root, root_deps) = self.create_node(name)?;
        let mut pending = vec![(root, root_deps)];
        while let Some((id, deps)) = pending.pop() {
            for dep in deps {
                let target = if let Some(existing) = self.graph.id_of(&dep) {
                    DependencyRef::Resolved(existing)
                } else if self.graph.is_missing(&dep) {
                    DependencyRef::Unresolved
                } else {
                    match self.create_node(&dep) {
                        Some((child, child_deps)) => {
                            pending.push((child, child_deps));
                            DependencyRef::Resolved(child)
                        }
                        None => DependencyRef::Unresolved,
                    }
                };
                self.graph.node_mut(id).add_dependency(dep, target);
            }
        }
        Some(root)
    }

    /// Looks `name` up, registers its node with empty dependencies and
    /// returns the dependency names still to be attached.
    fn create_node(&mut self, name: &str) -> Option<(NodeId, Vec<String>)> {
        let metadata = match self.provider.lookup(name) {
            Ok(metadata) => metadata,
            Err(err @ MetadataError::UnitNotFound(_)) => {
                warn!("{err}");
                self.graph.mark_missing(name);
                return None;
            }
            Err(err) => {
                warn!(
                    unit = name,
                    error = %err,
                    "metadata lookup failed, treating unit as unknown"
                );
                self.graph.mark_missing(name);
                return None;
            }
        };

        let mut node = UnitNode::new(name);
        node.version = metadata.version().map(str::to_string);
        if let Some((group, version)) = metadata.source() {
            node.source_group = Some(group.to_string());
            node.source_version = version.map(str::to_string);
        }

        let expression = metadata.dependency_expression(&self.fields);
        let parsed = parse_dependency_expression(&expression);
        for token in &parsed.malformed {
            warn!(unit = name, "{token}");
        }
        debug!(
            unit = name,
            provider = self.provider.id(),
            dependencies = parsed.names.len(),
            "resolved unit"
        );

        let id = self.graph.insert(node);
        Some((id, parsed.names))
    }
}
