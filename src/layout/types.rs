use std::collections::BTreeMap;

use crate::ir::Arrangement;

/// Axis-aligned rectangle; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn from_origin(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Midpoint of the given edge.
    pub fn anchor(&self, anchor: Anchor) -> (f32, f32) {
        let (cx, cy) = self.center();
        match anchor {
            Anchor::Top => (cx, self.y0),
            Anchor::Bottom => (cx, self.y1),
            Anchor::Left => (self.x0, cy),
            Anchor::Right => (self.x1, cy),
        }
    }

    /// True when the interiors intersect; rectangles that only touch do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    pub fn expand(&self, margin: f32) -> Rect {
        Rect::new(
            self.x0 - margin,
            self.y0 - margin,
            self.x1 + margin,
            self.y1 + margin,
        )
    }
}

/// A line of text and its vertical centre, measured from the top of its box.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedBox {
    pub node_id: String,
    pub rect: Rect,
    pub fill: String,
    pub title: Option<PlacedLine>,
    pub lines: Vec<PlacedLine>,
    /// Tree depth, grid row or Gantt row; zero for sequences.
    pub depth: usize,
    /// Set on the filler boxes of empty grid cells.
    pub placeholder: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Middle,
    End,
}

impl TextAlign {
    pub fn as_svg(&self) -> &'static str {
        match self {
            TextAlign::Start => "start",
            TextAlign::Middle => "middle",
            TextAlign::End => "end",
        }
    }
}

/// Free-standing text such as column headers, lane labels and axis ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub align: TextAlign,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorSegment {
    pub from: String,
    pub to: String,
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub arrow: bool,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub arrangement: Arrangement,
    pub boxes: BTreeMap<String, ComputedBox>,
    pub connectors: Vec<ConnectorSegment>,
    pub labels: Vec<TextPlacement>,
    /// Canvas extent including the configured margin.
    pub extent: Rect,
    pub font_size: f32,
}

impl Layout {
    pub fn width(&self) -> f32 {
        self.extent.width()
    }

    pub fn height(&self) -> f32 {
        self.extent.height()
    }

    pub fn box_for(&self, node_id: &str) -> Option<&ComputedBox> {
        self.boxes.get(node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_are_edge_midpoints() {
        let rect = Rect::from_origin(0.0, 0.0, 4.0, 2.0);
        assert_eq!(rect.anchor(Anchor::Left), (0.0, 1.0));
        assert_eq!(rect.anchor(Anchor::Right), (4.0, 1.0));
        assert_eq!(rect.anchor(Anchor::Top), (2.0, 0.0));
        assert_eq!(rect.anchor(Anchor::Bottom), (2.0, 2.0));
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::from_origin(0.0, 0.0, 3.0, 3.0);
        let b = Rect::from_origin(3.0, 0.0, 3.0, 3.0);
        let c = Rect::from_origin(2.0, 2.0, 3.0, 3.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }
}
