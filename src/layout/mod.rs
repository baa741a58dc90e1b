mod error;
mod gantt;
mod grid;
mod routing;
mod sequence;
pub(crate) mod text;
mod tree;
pub(crate) mod types;
pub use error::LayoutError;
pub use gantt::MAX_GANTT_TICKS;
pub use grid::PLACEHOLDER_PREFIX;
pub use routing::{ConnectorMode, route};
pub use text::{wrap, wrap_all};
pub use types::*;

use crate::config::LayoutParams;
use crate::ir::{Arrangement, Diagram};
use crate::theme::{FillResolver, Theme};
use std::collections::{BTreeMap, HashSet};

/// Boxes and free labels produced by one arrangement, before routing.
struct Placement {
    boxes: BTreeMap<String, ComputedBox>,
    labels: Vec<TextPlacement>,
    mode: ConnectorMode,
}

pub fn compute_layout(
    diagram: &Diagram,
    theme: &Theme,
    params: &LayoutParams,
) -> Result<Layout, LayoutError> {
    params.validate()?;
    validate_references(diagram)?;
    tracing::debug!(
        arrangement = ?diagram.arrangement,
        nodes = diagram.nodes.len(),
        edges = diagram.edges.len(),
        "computing layout"
    );

    let mut fills = FillResolver::new(theme);
    let placement = match diagram.arrangement {
        Arrangement::Sequence => sequence::compute_sequence_layout(diagram, params, &mut fills),
        Arrangement::Tree => tree::compute_tree_layout(diagram, params, &mut fills)?,
        Arrangement::Grid => grid::compute_grid_layout(diagram, params, &mut fills)?,
        Arrangement::Gantt => gantt::compute_gantt_layout(diagram, params, &mut fills)?,
    };
    let connectors = route(&diagram.edges, &placement.boxes, placement.mode)?;
    let extent = canvas_extent(&placement, &connectors, params);

    Ok(Layout {
        arrangement: diagram.arrangement,
        boxes: placement.boxes,
        connectors,
        labels: placement.labels,
        extent,
        font_size: params.font_size,
    })
}

fn validate_references(diagram: &Diagram) -> Result<(), LayoutError> {
    let mut ids: HashSet<&str> = HashSet::with_capacity(diagram.nodes.len());
    for node in &diagram.nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(LayoutError::DuplicateNode(node.id.clone()));
        }
    }
    for edge in &diagram.edges {
        for endpoint in [&edge.from, &edge.to] {
            if !ids.contains(endpoint.as_str()) {
                return Err(LayoutError::UnknownNode {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    missing: endpoint.clone(),
                });
            }
        }
    }
    Ok(())
}

fn canvas_extent(
    placement: &Placement,
    connectors: &[ConnectorSegment],
    params: &LayoutParams,
) -> Rect {
    let mut bounds: Option<Rect> = None;
    let mut include = |rect: Rect| {
        bounds = Some(match bounds {
            Some(current) => current.union(&rect),
            None => rect,
        });
    };
    for node in placement.boxes.values() {
        include(node.rect);
    }
    for label in &placement.labels {
        include(label_bounds(label, params));
    }
    for segment in connectors {
        include(Rect::new(
            segment.start.0.min(segment.end.0),
            segment.start.1.min(segment.end.1),
            segment.start.0.max(segment.end.0),
            segment.start.1.max(segment.end.1),
        ));
    }
    bounds
        .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
        .expand(params.margin)
}

/// Estimated footprint of a free label, from its character count.
fn label_bounds(label: &TextPlacement, params: &LayoutParams) -> Rect {
    let width = label.text.chars().count() as f32 * params.char_width;
    let half_height = params.line_height / 2.0;
    let x0 = match label.align {
        TextAlign::Start => label.x,
        TextAlign::Middle => label.x - width / 2.0,
        TextAlign::End => label.x - width,
    };
    Rect::new(x0, label.y - half_height, x0 + width, label.y + half_height)
}
