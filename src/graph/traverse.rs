use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::core::unit::{DependencyRef, NodeId, SourceTarget};
use crate::graph::builder::GraphBuilder;
use crate::graph::DependencyGraph;
use crate::metadata::MetadataProvider;

/// One dependency edge as met by the depth-first walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub name: String,
    pub depth: usize,
    /// False when the unit was already visited earlier in this walk; its
    /// subtree is shown at that first position only.
    pub first_visit: bool,
    /// False when the metadata provider has no record of the unit.
    pub resolved: bool,
}

struct Frame<'g> {
    children: Vec<(&'g str, DependencyRef)>,
    next: usize,
    depth: usize,
}

/// Walks a [`GraphBuilder`]'s graph, building nodes on first request. Every
/// top-level call starts from a fresh visited set.
pub struct Traversal<'b, P> {
    builder: &'b mut GraphBuilder<P>,
}

impl<'b, P: MetadataProvider> Traversal<'b, P> {
    pub fn new(builder: &'b mut GraphBuilder<P>) -> Self {
        Self { builder }
    }

    /// Depth-first walk from `root`, children in lexicographic order.
    ///
    /// Every edge is reported; a unit is descended into only on its first
    /// visit, which is what makes cycles of any length terminate. Returns
    /// `None` when `root` is unknown.
    pub fn walk(&mut self, root: &str) -> Option<Vec<TreeEntry>> {
        let root_id = self.builder.resolve_node(root)?;
        let graph = self.builder.graph();

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(graph.node(root_id).name.as_str());

        let mut entries = Vec::new();
        let mut stack = vec![Frame {
            children: sorted_children(graph, root_id),
            next: 0,
            depth: 1,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(&(name, target)) = frame.children.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let depth = frame.depth;

            let first_visit = visited.insert(name);
            entries.push(TreeEntry {
                name: name.to_string(),
                depth,
                first_visit,
                resolved: target.node().is_some(),
            });

            if let (true, Some(child)) = (first_visit, target.node()) {
                stack.push(Frame {
                    children: sorted_children(graph, child),
                    next: 0,
                    depth: depth + 1,
                });
            }
        }

        Some(entries)
    }

    /// All transitive dependencies of `root`, sorted, without duplicates and
    /// without `root` itself. Unknown units have no dependencies.
    pub fn list_dependencies(&mut self, root: &str) -> Vec<String> {
        dependency_names(&self.walk(root).unwrap_or_default(), false)
    }

    pub fn direct_dependencies(&mut self, root: &str) -> Vec<String> {
        match self.builder.resolve_node(root) {
            Some(id) => self
                .builder
                .graph()
                .node(id)
                .sorted_dependency_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        }
    }

    /// The source group `root` itself is built from, or `None` when the
    /// unit is unknown.
    pub fn own_source_target(&mut self, root: &str) -> Option<SourceTarget> {
        match self.builder.resolve_node(root) {
            Some(id) => Some(self.source_target(id)),
            None => {
                warn!("invalid package name '{root}'");
                None
            }
        }
    }

    /// Source groups for `root` and then each of its transitive
    /// dependencies in sorted order, keeping the first occurrence of each
    /// group.
    pub fn resolve_source_targets(&mut self, root: &str) -> Vec<SourceTarget> {
        let mut targets = Vec::new();
        let mut seen = HashSet::new();

        if let Some(target) = self.own_source_target(root) {
            seen.insert(target.name.clone());
            targets.push(target);
        }

        for dep in self.list_dependencies(root) {
            let Some(id) = self.builder.graph().id_of(&dep) else {
                warn!("invalid package name '{dep}'");
                continue;
            };
            let target = self.source_target(id);
            if seen.insert(target.name.clone()) {
                targets.push(target);
            }
        }
        targets
    }

    pub fn resolve_source_groups(&mut self, root: &str) -> Vec<String> {
        self.resolve_source_targets(root)
            .into_iter()
            .map(|target| target.name)
            .collect()
    }

    fn source_target(&self, id: NodeId) -> SourceTarget {
        let node = self.builder.graph().node(id);
        let group = node.source_group_or_name();
        if group == node.name {
            info!("getting source package '{}' for '{}'", group, node.name);
        } else {
            info!(
                "getting source package '{}' instead of '{}'",
                group, node.name
            );
        }
        SourceTarget {
            name: group.to_string(),
            version: node.source_version_or_version().map(str::to_string),
        }
    }
}

/// Sorted dependency names from one walk: every unit reached, or only the
/// direct dependencies when `direct_only` is set.
pub fn dependency_names(entries: &[TreeEntry], direct_only: bool) -> Vec<String> {
    let mut names: Vec<String> = entries
        .iter()
        .filter(|entry| {
            if direct_only {
                entry.depth == 1
            } else {
                entry.first_visit
            }
        })
        .map(|entry| entry.name.clone())
        .collect();
    names.sort();
    names.dedup();
    names
}

fn sorted_children(graph: &DependencyGraph, id: NodeId) -> Vec<(&str, DependencyRef)> {
    let mut children: Vec<(&str, DependencyRef)> = graph
        .node(id)
        .dependencies
        .iter()
        .map(|(name, target)| (name.as_str(), *target))
        .collect();
    children.sort_unstable_by(|a, b| a.0.cmp(b.0));
    children
}
