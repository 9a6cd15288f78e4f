//! Graphviz output.
//!
//! Node ids carry a layer prefix (`file:`, `module:`, `struct:`,
//! `method:`) so a module and a method with the same name stay apart.
//! Nodes and edges are emitted in sorted order.

use std::collections::BTreeSet;
use std::io::{self, Write};

use depscan_analysis::crawler::DependencyGraph;
use depscan_analysis::grammar::Layer;

use super::RenderOptions;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Node {
    id: String,
    label: String,
    shape: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Edge {
    from: String,
    to: String,
    label: &'static str,
}

fn node(prefix: &str, name: &str, shape: &'static str) -> Node {
    Node {
        id: format!("{prefix}:{name}"),
        label: name.to_string(),
        shape,
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

pub(super) fn write(graph: &DependencyGraph, options: &RenderOptions, out: &mut dyn Write) -> io::Result<()> {
    let filter = &options.filter;
    let mut nodes: BTreeSet<Node> = BTreeSet::new();
    let mut edges: BTreeSet<Edge> = BTreeSet::new();

    for dep in filter.dependencies(graph) {
        let file = node("file", &dep.source.to_string_lossy(), "box");
        let (target, label) = match dep.layer {
            Layer::Module => (node("module", &dep.target, "ellipse"), "imports"),
            Layer::Struct => (node("struct", &dep.target, "component"), "declares"),
            Layer::Method => (node("method", &dep.target, "oval"), "defines"),
        };
        edges.insert(Edge {
            from: file.id.clone(),
            to: target.id.clone(),
            label,
        });
        if let Some(base) = dep.base() {
            let parent = node("struct", base, "component");
            edges.insert(Edge {
                from: target.id.clone(),
                to: parent.id.clone(),
                label: "extends",
            });
            nodes.insert(parent);
        }
        nodes.insert(file);
        nodes.insert(target);
    }

    // Only calls that resolve to a known method become edges.
    let known: BTreeSet<&str> = graph.methods.iter().map(|m| m.name.as_str()).collect();
    for method in filter.methods(graph) {
        let caller = node("method", &method.name, "oval");
        for callee in method.dependencies.iter().filter(|c| known.contains(c.as_str())) {
            let target = node("method", callee, "oval");
            edges.insert(Edge {
                from: caller.id.clone(),
                to: target.id.clone(),
                label: "calls",
            });
            nodes.insert(target);
        }
        nodes.insert(caller);
    }

    writeln!(out, "digraph dependencies {{")?;
    writeln!(out, "  rankdir=LR;")?;
    writeln!(out, "  node [style=rounded];")?;
    writeln!(out, "  edge [arrowhead=vee];")?;
    writeln!(out)?;
    for n in &nodes {
        writeln!(
            out,
            "  \"{}\" [label=\"{}\", shape={}];",
            escape(&n.id),
            escape(&n.label),
            n.shape
        )?;
    }
    writeln!(out)?;
    for e in &edges {
        writeln!(
            out,
            "  \"{}\" -> \"{}\" [label=\"{}\"];",
            escape(&e.from),
            escape(&e.to),
            e.label
        )?;
    }
    writeln!(out, "}}")
}
