use serde::{Deserialize, Serialize};

use crate::glossary::Glossary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "TD", alias = "TB")]
    TopDown,
}

/// Topology rule governing how boxes are positioned relative to one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrangement {
    #[default]
    Sequence,
    Tree,
    Grid,
    Gantt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub column: String,
    pub row: String,
}

/// Half-open day range of a Gantt bar, measured from the project start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: f32,
    pub end: f32,
}

impl TimeSpan {
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cell: Option<CellRef>,
    #[serde(default)]
    pub span: Option<TimeSpan>,
}

impl DiagramNode {
    pub fn new<I, S>(id: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.to_string(),
            title: None,
            lines: lines.into_iter().map(Into::into).collect(),
            category: None,
            cell: None,
            span: None,
        }
    }

    /// A node whose only content is its own id, as used for tree labels.
    pub fn labeled(id: &str) -> Self {
        Self::new(id, [id])
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn in_cell(mut self, column: &str, row: &str) -> Self {
        self.cell = Some(CellRef {
            column: column.to_string(),
            row: row.to_string(),
        });
        self
    }

    pub fn spanning(mut self, start: f32, end: f32) -> Self {
        self.span = Some(TimeSpan { start, end });
        self
    }

    /// Text used where a node is referred to by a single caption.
    pub fn caption(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None if !self.lines.is_empty() => self.lines.join(" "),
            None => self.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
}

impl DiagramEdge {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridAxes {
    pub columns: Vec<String>,
    pub rows: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Diagram {
    pub title: Option<String>,
    pub arrangement: Arrangement,
    pub direction: Direction,
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    pub grid: Option<GridAxes>,
    pub glossary: Glossary,
}

impl Diagram {
    pub fn new(arrangement: Arrangement) -> Self {
        Self {
            arrangement,
            ..Self::default()
        }
    }

    /// Left-to-right sequence with an edge between every pair of neighbours.
    pub fn sequence(nodes: Vec<DiagramNode>) -> Self {
        let mut diagram = Self::new(Arrangement::Sequence);
        diagram.nodes = nodes;
        diagram.chain_edges();
        diagram
    }

    pub fn grid(columns: &[&str], rows: &[&str], nodes: Vec<DiagramNode>) -> Self {
        let mut diagram = Self::new(Arrangement::Grid);
        diagram.grid = Some(GridAxes {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows.iter().map(|r| r.to_string()).collect(),
        });
        diagram.nodes = nodes;
        diagram
    }

    /// Replaces the edge list with consecutive node pairs in declaration order.
    pub fn chain_edges(&mut self) {
        self.edges = self
            .nodes
            .windows(2)
            .map(|pair| DiagramEdge::new(&pair[0].id, &pair[1].id))
            .collect();
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
