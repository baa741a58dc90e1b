use super::*;
use crate::ir::TimeSpan;

/// Upper bound on `Day N` ticks along one chart axis.
pub const MAX_GANTT_TICKS: usize = 1_000;

fn checked_span(node: &crate::ir::DiagramNode) -> Result<TimeSpan, LayoutError> {
    let span = node.span.ok_or_else(|| LayoutError::MissingSpan {
        node: node.id.clone(),
    })?;
    let valid = span.start.is_finite()
        && span.end.is_finite()
        && span.start >= 0.0
        && span.end >= span.start;
    if !valid {
        return Err(LayoutError::InvalidSpan {
            node: node.id.clone(),
            start: span.start,
            end: span.end,
        });
    }
    Ok(span)
}

/// One bar per task, top to bottom in declaration order, on a day axis.
pub(super) fn compute_gantt_layout(
    diagram: &Diagram,
    params: &LayoutParams,
    fills: &mut FillResolver<'_>,
) -> Result<Placement, LayoutError> {
    let spans = diagram
        .nodes
        .iter()
        .map(checked_span)
        .collect::<Result<Vec<_>, _>>()?;

    let last_day = spans.iter().map(|span| span.end).fold(0.0_f32, f32::max);
    let steps = (last_day / params.tick_interval).floor();
    if steps >= MAX_GANTT_TICKS as f32 {
        return Err(LayoutError::TooManyTicks {
            last_day,
            tick_interval: params.tick_interval,
            limit: MAX_GANTT_TICKS,
        });
    }

    let chart_x = params.label_width;
    let pitch = params.bar_height + params.level_gap;
    let mut boxes = BTreeMap::new();
    let mut labels = Vec::with_capacity(diagram.nodes.len());

    for (idx, (node, span)) in diagram.nodes.iter().zip(&spans).enumerate() {
        let y0 = params.header_height + idx as f32 * pitch;
        let rect = Rect::from_origin(
            chart_x + span.start * params.day_width,
            y0,
            span.duration() * params.day_width,
            params.bar_height,
        );
        boxes.insert(
            node.id.clone(),
            ComputedBox {
                node_id: node.id.clone(),
                rect,
                fill: fills.fill_for(node.category.as_deref()),
                title: None,
                lines: Vec::new(),
                depth: idx,
                placeholder: false,
            },
        );
        labels.push(TextPlacement {
            x: chart_x - params.padding,
            y: y0 + params.bar_height / 2.0,
            text: node.caption(),
            align: TextAlign::End,
            bold: false,
        });
    }

    for day in (0..=steps as usize).map(|step| step as f32 * params.tick_interval) {
        labels.push(TextPlacement {
            x: chart_x + day * params.day_width,
            y: params.header_height / 2.0,
            text: format!("Day {}", day.round() as i64),
            align: TextAlign::Middle,
            bold: false,
        });
    }

    Ok(Placement {
        boxes,
        labels,
        mode: ConnectorMode::SequentialArrow,
    })
}
