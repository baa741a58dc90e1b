use crate::ir::Diagram;
use crate::layout::{Layout, PlacedLine};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub arrangement: String,
    pub direction: String,
    pub title: Option<String>,
    pub width: f32,
    pub height: f32,
    pub boxes: Vec<BoxDump>,
    pub connectors: Vec<ConnectorDump>,
    pub labels: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
pub struct BoxDump {
    pub id: String,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub fill: String,
    pub title: Option<LineDump>,
    pub lines: Vec<LineDump>,
    pub depth: usize,
    pub placeholder: bool,
}

#[derive(Debug, Serialize)]
pub struct LineDump {
    pub text: String,
    pub offset: f32,
}

impl From<&PlacedLine> for LineDump {
    fn from(line: &PlacedLine) -> Self {
        Self {
            text: line.text.clone(),
            offset: line.offset,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub from: String,
    pub to: String,
    pub arrow: bool,
    pub points: Vec<[f32; 2]>,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub align: String,
    pub bold: bool,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, diagram: &Diagram) -> Self {
        let boxes = layout
            .boxes
            .values()
            .map(|node| BoxDump {
                id: node.node_id.clone(),
                x0: node.rect.x0,
                y0: node.rect.y0,
                x1: node.rect.x1,
                y1: node.rect.y1,
                fill: node.fill.clone(),
                title: node.title.as_ref().map(LineDump::from),
                lines: node.lines.iter().map(LineDump::from).collect(),
                depth: node.depth,
                placeholder: node.placeholder,
            })
            .collect();

        let connectors = layout
            .connectors
            .iter()
            .map(|segment| ConnectorDump {
                from: segment.from.clone(),
                to: segment.to.clone(),
                arrow: segment.arrow,
                points: vec![
                    [segment.start.0, segment.start.1],
                    [segment.end.0, segment.end.1],
                ],
            })
            .collect();

        let labels = layout
            .labels
            .iter()
            .map(|label| LabelDump {
                text: label.text.clone(),
                x: label.x,
                y: label.y,
                align: label.align.as_svg().to_string(),
                bold: label.bold,
            })
            .collect();

        LayoutDump {
            arrangement: format!("{:?}", layout.arrangement),
            direction: format!("{:?}", diagram.direction),
            title: diagram.title.clone(),
            width: layout.width(),
            height: layout.height(),
            boxes,
            connectors,
            labels,
        }
    }
}

/// Writes the dump as pretty JSON to `path`, or to stdout when no path is given.
pub fn write_layout_dump(
    path: Option<&Path>,
    layout: &Layout,
    diagram: &Diagram,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, diagram);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &dump)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
