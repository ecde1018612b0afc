//! Graphviz rendering of relationship graphs.

use crate::graph::{RelationshipGraph, Role, Sex};

/// Render the graph in Graphviz DOT format.
///
/// Node shape encodes sex: box for male, ellipse for female, diamond when
/// the sex is unrecorded. Diseased genomes are drawn filled. Edges point
/// from parent to child and from original to derived sample, labelled with
/// the relationship tag.
///
/// The output is a plain string; pipe it to `dot -Tpng` or similar to get
/// an image.
pub fn render_dot(graph: &RelationshipGraph) -> String {
    let mut s = String::new();

    s.push_str("digraph pedigree {\n");
    s.push_str("    rankdir=TB;\n");
    s.push_str("    node [fontname=\"Helvetica\"];\n\n");

    for name in graph.genome_names() {
        if let Some(attrs) = graph.attributes(name) {
            let shape = match attrs.sex() {
                Sex::Male => "box",
                Sex::Female => "ellipse",
                Sex::Either => "diamond",
            };
            s.push_str(&format!("    {} [shape={}", quote(name), shape));
            if attrs.is_diseased() {
                s.push_str(", style=filled, fillcolor=grey80");
            }
            s.push_str("];\n");
        }
    }

    s.push('\n');
    for rel in graph.relationships_matching(&[]) {
        s.push_str(&format!(
            "    {} -> {} [label=\"{}\"];\n",
            quote(rel.endpoint(Role::First)),
            quote(rel.endpoint(Role::Second)),
            rel.kind()
        ));
    }

    s.push_str("}\n");
    s
}

/// Quote a DOT identifier, escaping embedded quotes and backslashes.
fn quote(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}
