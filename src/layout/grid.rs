use super::text::{content_height, stack_top, title_line, wrap_all};
use super::*;
use crate::ir::DiagramNode;
use std::collections::HashMap;

/// Ids of blank filler boxes start with this; grid nodes may not use it.
pub const PLACEHOLDER_PREFIX: &str = "__cell_";

fn lane_index<'a>(lanes: &'a [String]) -> Result<HashMap<&'a str, usize>, LayoutError> {
    let mut index = HashMap::with_capacity(lanes.len());
    for (idx, lane) in lanes.iter().enumerate() {
        if index.insert(lane.as_str(), idx).is_some() {
            return Err(LayoutError::DuplicateLane(lane.clone()));
        }
    }
    Ok(index)
}

/// Swimlanes: phases as columns, roles as rows, each row as tall as its busiest cell.
pub(super) fn compute_grid_layout(
    diagram: &Diagram,
    params: &LayoutParams,
    fills: &mut FillResolver<'_>,
) -> Result<Placement, LayoutError> {
    let axes = diagram.grid.as_ref().ok_or(LayoutError::MissingAxes)?;
    let column_index = lane_index(&axes.columns)?;
    let row_index = lane_index(&axes.rows)?;

    let mut cells: Vec<Vec<Option<&DiagramNode>>> =
        vec![vec![None; axes.columns.len()]; axes.rows.len()];
    for node in &diagram.nodes {
        if node.id.starts_with(PLACEHOLDER_PREFIX) {
            return Err(LayoutError::ReservedId(node.id.clone()));
        }
        let cell = node.cell.as_ref().ok_or_else(|| LayoutError::MissingCell {
            node: node.id.clone(),
        })?;
        let unknown = |lane: &str| LayoutError::UnknownLane {
            node: node.id.clone(),
            lane: lane.to_string(),
        };
        let column = *column_index
            .get(cell.column.as_str())
            .ok_or_else(|| unknown(&cell.column))?;
        let row = *row_index
            .get(cell.row.as_str())
            .ok_or_else(|| unknown(&cell.row))?;
        if cells[row][column].is_some() {
            return Err(LayoutError::DuplicateCell {
                column: cell.column.clone(),
                row: cell.row.clone(),
            });
        }
        cells[row][column] = Some(node);
    }

    let left = params.label_width;
    let column_pitch = params.box_width + params.spacing;
    let mut boxes = BTreeMap::new();
    let mut labels = Vec::new();
    let mut y = params.header_height;

    for (row, row_name) in axes.rows.iter().enumerate() {
        let wrapped: Vec<Vec<String>> = cells[row]
            .iter()
            .map(|cell| match cell {
                Some(node) => wrap_all(&node.lines, params.max_text_width),
                None => vec![String::new()],
            })
            .collect();
        let has_title = cells[row].iter().flatten().any(|node| node.title.is_some());
        let max_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        let row_height = content_height(max_lines, has_title, params);

        for (column, cell) in cells[row].iter().enumerate() {
            let rect = Rect::from_origin(
                left + column as f32 * column_pitch,
                y,
                params.box_width,
                row_height,
            );
            let (id, category, title) = match cell {
                Some(node) => (
                    node.id.clone(),
                    node.category.as_deref().unwrap_or(row_name),
                    node.title.as_deref(),
                ),
                None => (
                    format!("{PLACEHOLDER_PREFIX}{column}_{row}"),
                    row_name.as_str(),
                    None,
                ),
            };
            boxes.insert(
                id.clone(),
                ComputedBox {
                    node_id: id,
                    rect,
                    fill: fills.fill_for(Some(category)),
                    title: title.map(|t| title_line(t, params)),
                    lines: stack_top(&wrapped[column], has_title, params),
                    depth: row,
                    placeholder: cell.is_none(),
                },
            );
        }

        labels.push(TextPlacement {
            x: left - params.padding,
            y: y + row_height / 2.0,
            text: row_name.clone(),
            align: TextAlign::End,
            bold: true,
        });
        y += row_height + params.level_gap;
    }

    for (column, column_name) in axes.columns.iter().enumerate() {
        labels.push(TextPlacement {
            x: left + column as f32 * column_pitch + params.box_width / 2.0,
            y: params.header_height / 2.0,
            text: column_name.clone(),
            align: TextAlign::Middle,
            bold: true,
        });
    }

    Ok(Placement {
        boxes,
        labels,
        mode: ConnectorMode::SequentialArrow,
    })
}
