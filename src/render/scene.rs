//! Call-graph layout.
//!
//! Positions one node per hop (plus the synthetic `user` origin) on a
//! single row and describes the edges between consecutive nodes. No
//! markup is produced here; see `svg.rs`.

use crate::hoplog::HopLog;

/// Canvas height.
pub const HEIGHT: u32 = 200;
/// Node circle radius.
pub const RADIUS: u32 = 30;
/// Left and right canvas margin.
pub const MARGIN: u32 = 20;
/// Horizontal gap between neighbouring circles.
pub const SPACING: u32 = 40;

/// Label of the synthetic node standing for the client.
pub const ORIGIN_LABEL: &str = "user";

/// Visual variant of an edge, chosen by the destination's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStyle {
    Ok,
    Error,
}

impl EdgeStyle {
    fn for_status(status: Option<u16>) -> Self {
        match status {
            None | Some(200) => EdgeStyle::Ok,
            Some(_) => EdgeStyle::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub label: String,
    pub status: Option<u16>,
    pub x: u32,
    pub y: u32,
}

/// Directed edge between `nodes[from]` and `nodes[to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub radius: u32,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Canvas width for `count` nodes.
pub fn canvas_width(count: u32) -> u32 {
    2 * RADIUS * count + 2 * MARGIN + SPACING * count.saturating_sub(1)
}

impl Scene {
    /// Lay out `log` left to right behind the origin node.
    pub fn layout(log: &HopLog) -> Self {
        let labels = std::iter::once((ORIGIN_LABEL.to_string(), None))
            .chain(log.iter().map(|r| (r.service_name.clone(), r.status)));

        let y = HEIGHT / 2;
        let nodes: Vec<Node> = labels
            .enumerate()
            .map(|(i, (label, status))| Node {
                label,
                status,
                x: MARGIN + RADIUS + (2 * RADIUS + SPACING) * i as u32,
                y,
            })
            .collect();

        let edges = nodes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| Edge {
                from: i,
                to: i + 1,
                style: EdgeStyle::for_status(pair[1].status),
            })
            .collect();

        Self {
            width: canvas_width(nodes.len() as u32),
            height: HEIGHT,
            radius: RADIUS,
            nodes,
            edges,
        }
    }
}
