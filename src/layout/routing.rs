use std::collections::BTreeMap;

use crate::ir::DiagramEdge;

use super::{Anchor, ComputedBox, ConnectorSegment, LayoutError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorMode {
    /// Right-centre of the source to left-centre of the target, arrowed.
    SequentialArrow,
    /// Bottom-centre of the source to top-centre of the target, arrowed.
    StackedArrow,
    /// Bottom-centre of the parent to top-centre of the child, no arrowhead.
    TreeLine,
}

impl ConnectorMode {
    fn anchors(self) -> (Anchor, Anchor, bool) {
        match self {
            ConnectorMode::SequentialArrow => (Anchor::Right, Anchor::Left, true),
            ConnectorMode::StackedArrow => (Anchor::Bottom, Anchor::Top, true),
            ConnectorMode::TreeLine => (Anchor::Bottom, Anchor::Top, false),
        }
    }
}

/// Emits one straight segment per edge, in edge order.
pub fn route(
    edges: &[DiagramEdge],
    boxes: &BTreeMap<String, ComputedBox>,
    mode: ConnectorMode,
) -> Result<Vec<ConnectorSegment>, LayoutError> {
    let (from_anchor, to_anchor, arrow) = mode.anchors();
    edges
        .iter()
        .map(|edge| {
            let source = lookup(boxes, edge, &edge.from)?;
            let target = lookup(boxes, edge, &edge.to)?;
            Ok(ConnectorSegment {
                from: edge.from.clone(),
                to: edge.to.clone(),
                start: source.rect.anchor(from_anchor),
                end: target.rect.anchor(to_anchor),
                arrow,
            })
        })
        .collect()
}

fn lookup<'a>(
    boxes: &'a BTreeMap<String, ComputedBox>,
    edge: &DiagramEdge,
    id: &str,
) -> Result<&'a ComputedBox, LayoutError> {
    boxes.get(id).ok_or_else(|| LayoutError::UnknownNode {
        from: edge.from.clone(),
        to: edge.to.clone(),
        missing: id.to_string(),
    })
}
