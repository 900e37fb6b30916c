use std::collections::{HashMap, HashSet};

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::config::RenderConfig;
use crate::core::unit::DependencyRef;
use crate::graph::traverse::TreeEntry;
use crate::graph::DependencyGraph;

pub fn render_flat(dependencies: &[String], render: &RenderConfig) -> String {
    let mut out = String::new();
    if dependencies.is_empty() {
        out.push_str(&render.flat_indent);
        out.push_str("No depends\n");
        return out;
    }
    for dep in dependencies {
        out.push_str(&render.flat_indent);
        out.push_str(dep);
        out.push('\n');
    }
    out
}

/// One line per edge: the indent string repeated `depth - 1` times, the
/// branch marker, then the name. Back-references carry no children.
pub fn render_tree(entries: &[TreeEntry], render: &RenderConfig) -> String {
    let mut out = String::new();
    for entry in entries {
        for _ in 1..entry.depth {
            out.push_str(&render.indent);
        }
        out.push_str(&render.branch);
        out.push_str(&entry.name);
        out.push('\n');
    }
    out
}

/// DOT graph of the units reachable from `root`, or only its direct edges
/// when `transitive` is false. Unknown units are drawn as leaves.
pub fn render_dot(graph: &DependencyGraph, root: &str, transitive: bool) -> String {
    let mut dot: DiGraph<String, &'static str> = DiGraph::new();
    let mut indices: HashMap<String, NodeIndex> = HashMap::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut stack = vec![root.to_string()];

    while let Some(name) = stack.pop() {
        if !seen.insert(name.clone()) {
            continue;
        }
        let from = node_index(&mut dot, &mut indices, &name);
        let Some(node) = graph.node_by_name(&name) else {
            continue;
        };
        for dep in node.sorted_dependency_names() {
            let to = node_index(&mut dot, &mut indices, dep);
            dot.add_edge(from, to, "");
            let resolved = matches!(node.dependencies.get(dep), Some(DependencyRef::Resolved(_)));
            if transitive && resolved {
                stack.push(dep.to_string());
            }
        }
    }

    format!("{}", Dot::with_config(&dot, &[Config::EdgeNoLabel]))
}

fn node_index(
    dot: &mut DiGraph<String, &'static str>,
    indices: &mut HashMap<String, NodeIndex>,
    name: &str,
) -> NodeIndex {
    *indices
        .entry(name.to_string())
        .or_insert_with(|| dot.add_node(name.to_string()))
}
