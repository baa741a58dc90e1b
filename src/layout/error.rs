/// Configuration errors found while laying out a diagram.
///
/// Every variant is raised before any box is produced, so a failed layout
/// never yields a partial result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("edge {from} -> {to} references unknown node {missing:?}")]
    UnknownNode {
        from: String,
        to: String,
        missing: String,
    },
    #[error("node id {0:?} is declared more than once")]
    DuplicateNode(String),
    #[error("tree contains a cycle through node {node:?}")]
    CyclicTree { node: String },
    #[error("tree node {node:?} has more than one parent")]
    MultipleParents { node: String },
    #[error("tree has several roots: {}", .0.join(", "))]
    MultipleRoots(Vec<String>),
    #[error(
        "node {node:?} needs height {required} but level {level} is fixed at {available}"
    )]
    LevelOverflow {
        node: String,
        level: usize,
        required: f32,
        available: f32,
    },
    #[error("grid arrangement requires column and row axes")]
    MissingAxes,
    #[error("lane {0:?} appears more than once on a grid axis")]
    DuplicateLane(String),
    #[error("grid node {node:?} has no cell")]
    MissingCell { node: String },
    #[error("grid node {node:?} references unknown lane {lane:?}")]
    UnknownLane { node: String, lane: String },
    #[error("grid cell ({column:?}, {row:?}) is assigned more than one node")]
    DuplicateCell { column: String, row: String },
    #[error("gantt node {node:?} has no span")]
    MissingSpan { node: String },
    #[error("gantt node {node:?} has an invalid span {start}..{end}")]
    InvalidSpan { node: String, start: f32, end: f32 },
    #[error(
        "gantt axis up to day {last_day} every {tick_interval} days exceeds {limit} ticks"
    )]
    TooManyTicks {
        last_day: f32,
        tick_interval: f32,
        limit: usize,
    },
    #[error("node id {0:?} uses the reserved placeholder prefix")]
    ReservedId(String),
    #[error("invalid layout parameters: {0}")]
    InvalidParams(String),
}
