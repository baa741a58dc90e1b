//! JSON5 diagram files.
//!
//! A file names its arrangement and lists nodes either as bare ids or as full
//! objects. Grids may give their content as a `cells` table keyed by column
//! then row instead of listing nodes. A sequence without an `edges` key is
//! chained in declaration order.

use crate::config::LayoutParamsFile;
use crate::glossary::Glossary;
use crate::ir::{
    Arrangement, CellRef, Diagram, DiagramEdge, DiagramNode, Direction, GridAxes, TimeSpan,
};
use anyhow::Result;
use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub diagram: Diagram,
    /// Layout overrides carried by the diagram file itself.
    pub layout: Option<LayoutParamsFile>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LinesInput {
    One(String),
    Many(Vec<String>),
}

impl LinesInput {
    fn into_lines(self) -> Vec<String> {
        match self {
            LinesInput::One(line) => vec![line],
            LinesInput::Many(lines) => lines,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NodeFields {
    id: String,
    title: Option<String>,
    lines: Option<LinesInput>,
    category: Option<String>,
    cell: Option<CellRef>,
    span: Option<TimeSpan>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeInput {
    Id(String),
    Full(NodeFields),
}

impl NodeInput {
    fn into_node(self) -> DiagramNode {
        match self {
            NodeInput::Id(id) => DiagramNode::labeled(&id),
            NodeInput::Full(node) => DiagramNode {
                lines: node.lines.map(LinesInput::into_lines).unwrap_or_default(),
                id: node.id,
                title: node.title,
                category: node.category,
                cell: node.cell,
                span: node.span,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EdgeInput {
    Pair(String, String),
    Full(DiagramEdge),
}

impl From<EdgeInput> for DiagramEdge {
    fn from(input: EdgeInput) -> Self {
        match input {
            EdgeInput::Pair(from, to) => DiagramEdge { from, to },
            EdgeInput::Full(edge) => edge,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DiagramFile {
    title: Option<String>,
    #[serde(default)]
    arrangement: Arrangement,
    #[serde(default)]
    direction: Direction,
    #[serde(default)]
    nodes: Vec<NodeInput>,
    edges: Option<Vec<EdgeInput>>,
    columns: Option<Vec<String>>,
    rows: Option<Vec<String>>,
    cells: Option<IndexMap<String, IndexMap<String, LinesInput>>>,
    #[serde(default)]
    glossary: Glossary,
    layout: Option<LayoutParamsFile>,
}

pub fn parse_diagram(input: &str) -> Result<ParseOutput> {
    let file: DiagramFile =
        json5::from_str(input).map_err(|err| anyhow::anyhow!("invalid diagram file: {err}"))?;

    let mut diagram = Diagram::new(file.arrangement);
    diagram.title = file.title;
    diagram.direction = file.direction;
    diagram.glossary = file.glossary;
    diagram.nodes = file.nodes.into_iter().map(NodeInput::into_node).collect();

    if let Some(cells) = file.cells {
        for (column, rows) in cells {
            for (row, lines) in rows {
                diagram.nodes.push(
                    DiagramNode::new(&format!("{column} / {row}"), lines.into_lines())
                        .in_cell(&column, &row),
                );
            }
        }
    }

    diagram.grid = grid_axes(file.columns, file.rows, &diagram.nodes);

    match file.edges {
        Some(edges) => diagram.edges = edges.into_iter().map(DiagramEdge::from).collect(),
        None if diagram.arrangement == Arrangement::Sequence => diagram.chain_edges(),
        None => {}
    }

    tracing::debug!(
        arrangement = ?diagram.arrangement,
        nodes = diagram.nodes.len(),
        glossary = diagram.glossary.len(),
        "parsed diagram"
    );
    Ok(ParseOutput {
        diagram,
        layout: file.layout,
    })
}

/// Explicit axes win; otherwise lanes are collected from node cells in first-seen order.
fn grid_axes(
    columns: Option<Vec<String>>,
    rows: Option<Vec<String>>,
    nodes: &[DiagramNode],
) -> Option<GridAxes> {
    let mut inferred = GridAxes::default();
    for cell in nodes.iter().filter_map(|node| node.cell.as_ref()) {
        if !inferred.columns.contains(&cell.column) {
            inferred.columns.push(cell.column.clone());
        }
        if !inferred.rows.contains(&cell.row) {
            inferred.rows.push(cell.row.clone());
        }
    }
    if columns.is_none() && rows.is_none() && inferred.columns.is_empty() {
        return None;
    }
    Some(GridAxes {
        columns: columns.unwrap_or(inferred.columns),
        rows: rows.unwrap_or(inferred.rows),
    })
}
