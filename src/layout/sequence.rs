use super::text::{content_height, distribute, title_line, wrap_all};
use super::*;
use crate::ir::Direction;

/// Lifecycle flows: equal boxes along one axis, all as tall as the busiest one.
pub(super) fn compute_sequence_layout(
    diagram: &Diagram,
    params: &LayoutParams,
    fills: &mut FillResolver<'_>,
) -> Placement {
    let wrapped: Vec<Vec<String>> = diagram
        .nodes
        .iter()
        .map(|node| wrap_all(&node.lines, params.max_text_width))
        .collect();
    let has_title = diagram.nodes.iter().any(|node| node.title.is_some());
    let max_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1);
    let height = params
        .box_height
        .max(content_height(max_lines, has_title, params));

    let mut boxes = BTreeMap::new();
    for (idx, (node, lines)) in diagram.nodes.iter().zip(&wrapped).enumerate() {
        let step = idx as f32;
        let (x0, y0) = match diagram.direction {
            Direction::LeftRight => (step * (params.box_width + params.spacing), 0.0),
            Direction::TopDown => (0.0, step * (height + params.spacing)),
        };
        boxes.insert(
            node.id.clone(),
            ComputedBox {
                node_id: node.id.clone(),
                rect: Rect::from_origin(x0, y0, params.box_width, height),
                fill: fills.fill_for(node.category.as_deref()),
                title: node.title.as_deref().map(|t| title_line(t, params)),
                lines: distribute(lines, height, has_title, params),
                depth: 0,
                placeholder: false,
            },
        );
    }

    let mode = match diagram.direction {
        Direction::LeftRight => ConnectorMode::SequentialArrow,
        Direction::TopDown => ConnectorMode::StackedArrow,
    };
    Placement {
        boxes,
        labels: Vec::new(),
        mode,
    }
}
