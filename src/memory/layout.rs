//! Node-link rendering of the memory graph.
//!
//! [`render_svg`] is a pure function of the graph and a viewport: calling it
//! again — after a resize, after new nodes — produces a fresh document with
//! no other side effects.

use crate::memory::types::{MemoryCategory, MemoryGraph};

/// Render target dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
        }
    }
}

/// Render the graph as an SVG document.
///
/// Edges are drawn first so nodes sit on top. Edges whose endpoints are
/// missing from the node set are skipped rather than drawn half-anchored.
pub fn render_svg(graph: &MemoryGraph, viewport: Viewport) -> String {
    let Viewport { width, height } = viewport;
    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    ));

    if graph.nodes.is_empty() {
        svg.push_str(&format!(
            r##"<text x="{}" y="{}" text-anchor="middle" fill="#888">Your shared journey will be visualized here as you interact over time.</text>"##,
            width / 2.0,
            height / 2.0
        ));
        svg.push_str("</svg>");
        return svg;
    }

    let find = |id: u64| graph.nodes.iter().find(|n| n.id == id);

    for edge in &graph.edges {
        let (Some(source), Some(target)) = (find(edge.source), find(edge.target)) else {
            continue;
        };
        svg.push_str(&format!(
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#aaa" stroke-width="{:.1}" stroke-opacity="0.6"/>"##,
            source.position.x * width,
            source.position.y * height,
            target.position.x * width,
            target.position.y * height,
            edge.strength * 3.0,
        ));
    }

    for node in &graph.nodes {
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"><title>{} ({})</title></circle>"#,
            node.position.x * width,
            node.position.y * height,
            10.0 * node.weight,
            node.category.color(),
            escape_xml(&node.content),
            node.timestamp.format("%Y-%m-%d"),
        ));
    }

    render_legend(&mut svg, height);

    svg.push_str("</svg>");
    svg
}

/// Legend row: one swatch per category along the bottom edge.
fn render_legend(svg: &mut String, height: f64) {
    let y = height - 16.0;
    let mut x = 16.0;
    for category in MemoryCategory::ALL {
        svg.push_str(&format!(
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="6" fill="{}"/>"#,
            category.color()
        ));
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-size="12" fill="#555">{}</text>"##,
            x + 12.0,
            y + 4.0,
            title_case(category.as_str()),
        ));
        x += 110.0;
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::types::{MemoryEdge, MemoryNode, Position};
    use chrono::Utc;

    fn node(id: u64, category: MemoryCategory, x: f64, y: f64) -> MemoryNode {
        MemoryNode {
            id,
            category,
            content: format!("node {id}"),
            timestamp: Utc::now(),
            position: Position { x, y },
            weight: 1.0,
        }
    }

    #[test]
    fn empty_graph_renders_placeholder() {
        let svg = render_svg(&MemoryGraph::default(), Viewport::default());
        assert!(svg.contains("shared journey"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn nodes_and_edges_are_drawn() {
        let graph = MemoryGraph {
            nodes: vec![
                node(1, MemoryCategory::Conversation, 0.25, 0.25),
                node(2, MemoryCategory::Ritual, 0.75, 0.75),
            ],
            edges: vec![MemoryEdge {
                source: 1,
                target: 2,
                strength: 0.8,
            }],
        };

        let svg = render_svg(&graph, Viewport { width: 100.0, height: 100.0 });
        assert!(svg.contains(r#"<line x1="25.0" y1="25.0" x2="75.0" y2="75.0""#));
        assert!(svg.contains(MemoryCategory::Conversation.color()));
        assert!(svg.contains(MemoryCategory::Ritual.color()));
    }

    #[test]
    fn dangling_edges_are_skipped() {
        let graph = MemoryGraph {
            nodes: vec![node(1, MemoryCategory::Insight, 0.5, 0.5)],
            edges: vec![MemoryEdge {
                source: 1,
                target: 99,
                strength: 0.6,
            }],
        };

        let svg = render_svg(&graph, Viewport::default());
        assert!(!svg.contains("<line"));
    }

    #[test]
    fn rendering_is_repeatable() {
        let graph = MemoryGraph {
            nodes: vec![node(1, MemoryCategory::Emotion, 0.4, 0.6)],
            edges: vec![],
        };

        let first = render_svg(&graph, Viewport::default());
        let second = render_svg(&graph, Viewport::default());
        assert_eq!(first, second);
    }

    #[test]
    fn content_is_escaped() {
        let mut graph = MemoryGraph::default();
        graph.nodes.push(MemoryNode {
            id: 1,
            category: MemoryCategory::Conversation,
            content: "<script>\"quotes\" & more</script>".into(),
            timestamp: Utc::now(),
            position: Position { x: 0.5, y: 0.5 },
            weight: 1.0,
        });

        let svg = render_svg(&graph, Viewport::default());
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;"));
    }
}
