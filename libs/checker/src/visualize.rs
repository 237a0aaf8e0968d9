//! Graph renderings of equation trees for debugging and teaching.
//!
//! Supports multiple output formats:
//! - DOT/Graphviz record nodes (render with `dot -Tsvg`)
//! - Mermaid diagrams (for markdown/web rendering)
//! - ASCII tree (for terminal viewing)
//!
//! Node identifiers come from a counter scoped to one render call. They are not
//! stable across calls and are never parsed back.

use crate::expression::{Expression, Side, Term};
use crate::formula::Formula;
use crate::statement::Statement;
use std::fmt::Write as FmtWrite;

/// Visualization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizationFormat {
    /// DOT/Graphviz format (can be rendered with `dot` command)
    Dot,
    /// Mermaid diagram format (renders in markdown, GitHub, etc.)
    Mermaid,
    /// ASCII tree format (for terminal viewing)
    AsciiTree,
}

/// One node of a rendered tree: a type label, the node's rendered value and
/// its children in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub label: &'static str,
    pub value: String,
    pub children: Vec<GraphNode>,
}

impl GraphNode {
    fn leaf(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            children: Vec::new(),
        }
    }
}

/// Types that can describe themselves as a graph fragment.
pub trait ToGraph {
    fn to_graph(&self) -> GraphNode;
}

/// Trait for types that can be visualized
pub trait Visualize {
    /// Generate visualization in the specified format
    fn visualize(&self, format: VisualizationFormat) -> String;
}

impl<T: ToGraph> Visualize for T {
    fn visualize(&self, format: VisualizationFormat) -> String {
        let root = self.to_graph();
        match format {
            VisualizationFormat::Dot => visualize_dot(&root),
            VisualizationFormat::Mermaid => visualize_mermaid(&root),
            VisualizationFormat::AsciiTree => visualize_ascii(&root, 0),
        }
    }
}

impl ToGraph for Formula {
    fn to_graph(&self) -> GraphNode {
        GraphNode {
            label: self.type_name(),
            value: self.to_string(),
            children: self.children().into_iter().map(ToGraph::to_graph).collect(),
        }
    }
}

impl ToGraph for Term {
    fn to_graph(&self) -> GraphNode {
        GraphNode {
            label: "Term",
            value: self.to_string(),
            children: vec![self.formula().to_graph()],
        }
    }
}

impl ToGraph for Expression {
    fn to_graph(&self) -> GraphNode {
        let sides = Side::BOTH
            .iter()
            .map(|&side| {
                let terms = self.side(side);
                let value = terms
                    .iter()
                    .map(Term::to_string)
                    .collect::<Vec<_>>()
                    .join(" + ");
                let label = match side {
                    Side::Reactants => "Reactants",
                    Side::Products => "Products",
                };
                GraphNode {
                    label,
                    value,
                    children: terms.iter().map(ToGraph::to_graph).collect(),
                }
            })
            .collect();

        GraphNode {
            label: "Expression",
            value: self.to_string(),
            children: sides,
        }
    }
}

impl ToGraph for Statement {
    fn to_graph(&self) -> GraphNode {
        let label = match self {
            Statement::Chemical(_) => "ChemicalStatement",
            Statement::Nuclear(_) => "NuclearStatement",
        };
        let mut node = GraphNode::leaf(label, self.to_string());
        node.children.push(self.expression().to_graph());
        node
    }
}

// =============================================================================
// DOT
// =============================================================================

fn visualize_dot(root: &GraphNode) -> String {
    let mut output = String::from("digraph chemical_syntax_tree {\n");
    output.push_str("    node [shape=record, penwidth=2, splines=ortho];\n");
    let mut counter = 0;
    visit_dot(root, &mut counter, None, &mut output);
    output.push_str("}\n");
    output
}

fn visit_dot(node: &GraphNode, counter: &mut usize, parent_id: Option<usize>, output: &mut String) {
    let current_id = *counter;
    *counter += 1;

    let _ = writeln!(
        output,
        "    n{} [label=\"{{{}|{}}}\"];",
        current_id,
        escape_record(node.label),
        escape_record(&node.value)
    );

    if let Some(parent) = parent_id {
        let _ = writeln!(output, "    n{}:s -> n{}:n;", parent, current_id);
    }

    for child in &node.children {
        visit_dot(child, counter, Some(current_id), output);
    }
}

/// Escapes characters that carry meaning inside DOT record labels.
fn escape_record(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '{' | '}' | '|' | '<' | '>' | '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Mermaid
// =============================================================================

fn visualize_mermaid(root: &GraphNode) -> String {
    let mut output = String::from("graph TD\n");
    let mut counter = 0;
    visit_mermaid(root, &mut counter, None, &mut output);
    output
}

fn visit_mermaid(
    node: &GraphNode,
    counter: &mut usize,
    parent_id: Option<usize>,
    output: &mut String,
) {
    let current_id = *counter;
    *counter += 1;

    let _ = writeln!(
        output,
        "    n{}[\"{}: {}\"]",
        current_id,
        node.label,
        escape_mermaid(&node.value)
    );

    if let Some(parent) = parent_id {
        let _ = writeln!(output, "    n{} --> n{}", parent, current_id);
    }

    for child in &node.children {
        visit_mermaid(child, counter, Some(current_id), output);
    }
}

fn escape_mermaid(text: &str) -> String {
    text.replace('"', "#quot;")
        .replace('<', "#lt;")
        .replace('>', "#gt;")
}

// =============================================================================
// ASCII
// =============================================================================

fn visualize_ascii(node: &GraphNode, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let mut output = format!("{}├─ {}: {}\n", indent, node.label, node.value);
    for child in &node.children {
        output.push_str(&visualize_ascii(child, depth + 1));
    }
    output
}
