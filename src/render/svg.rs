//! SVG serialization of a laid-out call graph.

use std::fmt::Write;

use crate::render::scene::{Edge, EdgeStyle, Node, Scene};

const BACKGROUND: &str = "rgb(230,230,230)";
const NODE_FILL: &str = "rgb(210,226,241)";
const LABEL_FILL: &str = "rgb(102,102,102)";

impl EdgeStyle {
    fn stroke(self) -> &'static str {
        match self {
            EdgeStyle::Ok => "green",
            EdgeStyle::Error => "red",
        }
    }

    fn marker_id(self) -> &'static str {
        match self {
            EdgeStyle::Ok => "arrow",
            EdgeStyle::Error => "arrowerr",
        }
    }

    fn marker_fill(self) -> &'static str {
        match self {
            EdgeStyle::Ok => "rgb(65,141,85)",
            EdgeStyle::Error => "red",
        }
    }
}

/// Render `scene` as an inline `<svg>` element.
pub fn to_svg(scene: &Scene) -> String {
    let mut out = String::new();
    // Writing into a String never fails.
    let _ = write_svg(&mut out, scene);
    out
}

fn write_svg(out: &mut String, scene: &Scene) -> std::fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" style="margin: 0 auto;">"#,
        w = scene.width,
        h = scene.height
    )?;
    for style in [EdgeStyle::Ok, EdgeStyle::Error] {
        writeln!(
            out,
            r#"<marker id="{id}" viewBox="0 0 10 10" refX="5" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{fill}" /></marker>"#,
            id = style.marker_id(),
            fill = style.marker_fill()
        )?;
    }
    writeln!(
        out,
        r#"<rect width="{w}" height="{h}" style="fill:{BACKGROUND}" />"#,
        w = scene.width,
        h = scene.height
    )?;

    for node in &scene.nodes {
        write_node(out, node, scene.radius)?;
    }
    for edge in &scene.edges {
        write_edge(out, scene, edge)?;
    }

    out.push_str("</svg>");
    Ok(())
}

fn write_node(out: &mut String, node: &Node, radius: u32) -> std::fmt::Result {
    writeln!(
        out,
        r#"<circle cx="{x}" cy="{y}" r="{radius}" fill="{NODE_FILL}" />"#,
        x = node.x,
        y = node.y
    )?;
    writeln!(
        out,
        r#"<text text-anchor="middle" x="{x}" y="{y}" fill="{LABEL_FILL}">{label}</text>"#,
        x = node.x,
        y = node.y,
        label = escape(&node.label)
    )
}

/// Two arcs per edge: over the top ending in an arrow, under the bottom
/// starting with one.
fn write_edge(out: &mut String, scene: &Scene, edge: &Edge) -> std::fmt::Result {
    let (Some(from), Some(to)) = (scene.nodes.get(edge.from), scene.nodes.get(edge.to)) else {
        return Ok(());
    };
    let r = scene.radius as i64;
    let (x, y) = (from.x as i64, from.y as i64);
    let dx = to.x as i64 - x;
    let dy = to.y as i64 - y;
    let mid = dx / 2;
    let stroke = edge.style.stroke();
    let marker = edge.style.marker_id();

    writeln!(
        out,
        r#"<path d="M {x} {top} q {mid} {neg_r} {dx} {dy}" stroke="{stroke}" stroke-width="2" fill="none" marker-end="url(#{marker})" />"#,
        top = y - r,
        neg_r = -r
    )?;
    writeln!(
        out,
        r#"<path d="M {x} {bottom} q {mid} {r} {dx} {dy}" stroke="{stroke}" stroke-width="2" fill="none" marker-start="url(#{marker})" />"#,
        bottom = y + r
    )
}

/// Escape text for inclusion in SVG/HTML content or attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hoplog::{HopLog, HopRecord};

    fn render(records: Vec<HopRecord>) -> String {
        to_svg(&Scene::layout(&HopLog::from(records)))
    }

    #[test]
    fn test_declares_canvas() {
        let svg = render(vec![HopRecord::with_status("a", 200)]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"width="200" height="200""#));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(">user</text>"));
        assert!(svg.contains(">a</text>"));
    }

    #[test]
    fn test_two_arcs_per_edge() {
        let svg = render(vec![
            HopRecord::with_status("a", 200),
            HopRecord::with_status("b", 408),
        ]);
        assert_eq!(svg.matches("stroke-width=\"2\"").count(), 4);
        assert_eq!(svg.matches("marker-end=\"url(#arrow)\"").count(), 1);
        assert_eq!(svg.matches("marker-end=\"url(#arrowerr)\"").count(), 1);
        assert!(svg.contains(r#"<path d="M 50 70 q 50 -30 100 0" stroke="green""#));
        assert!(svg.contains(r#"<path d="M 150 130 q 50 30 100 0" stroke="red""#));
    }

    #[test]
    fn test_labels_are_escaped() {
        let svg = render(vec![HopRecord::pending("<script>")]);
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;"));
    }
}
