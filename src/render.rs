use crate::config::RenderConfig;
use crate::highlight::TermHighlighter;
use crate::layout::{ComputedBox, Layout, TextAlign, TextPlacement};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(layout: &Layout, theme: &Theme, highlighter: &TermHighlighter<'_>) -> String {
    let mut svg = String::new();
    let extent = layout.extent;
    let width = layout.width();
    let height = layout.height();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{:.2} {:.2} {width:.2} {height:.2}\">",
        extent.x0, extent.y0
    ));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        extent.x0, extent.y0, theme.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");

    for segment in &layout.connectors {
        let d = points_to_path(&[segment.start, segment.end]);
        let marker = if segment.arrow { "marker-end=\"url(#arrow)\"" } else { "" };
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.6\" {} />",
            d, theme.line_color, marker
        ));
    }

    for node in layout.boxes.values() {
        svg.push_str(&box_svg(node, theme, layout.font_size, highlighter));
    }

    for label in &layout.labels {
        svg.push_str(&label_svg(label, theme, layout.font_size, highlighter));
    }

    svg.push_str("</svg>");
    svg
}

fn box_svg(
    node: &ComputedBox,
    theme: &Theme,
    font_size: f32,
    highlighter: &TermHighlighter<'_>,
) -> String {
    let rect = node.rect;
    let mut out = String::new();
    let opacity = if node.placeholder { " fill-opacity=\"0.35\"" } else { "" };
    out.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"10\" ry=\"10\" fill=\"{}\"{} stroke=\"{}\" stroke-width=\"1.4\"/>",
        rect.x0,
        rect.y0,
        rect.width(),
        rect.height(),
        node.fill,
        opacity,
        theme.box_stroke
    ));

    let center_x = rect.center().0;
    let style = TextStyle {
        align: TextAlign::Middle,
        fill: &theme.box_text_color,
        font_family: &theme.font_family,
        font_size,
        highlight_fill: &theme.highlight_color,
    };
    if let Some(title) = &node.title {
        out.push_str(&text_svg(
            center_x,
            rect.y0 + title.offset,
            &title.text,
            true,
            &style,
            highlighter,
        ));
    }
    for line in node.lines.iter().filter(|line| !line.text.is_empty()) {
        out.push_str(&text_svg(
            center_x,
            rect.y0 + line.offset,
            &line.text,
            false,
            &style,
            highlighter,
        ));
    }
    out
}

fn label_svg(
    label: &TextPlacement,
    theme: &Theme,
    font_size: f32,
    highlighter: &TermHighlighter<'_>,
) -> String {
    let style = TextStyle {
        align: label.align,
        fill: &theme.text_color,
        font_family: &theme.font_family,
        font_size,
        highlight_fill: &theme.highlight_color,
    };
    text_svg(label.x, label.y, &label.text, label.bold, &style, highlighter)
}

struct TextStyle<'a> {
    align: TextAlign,
    fill: &'a str,
    font_family: &'a str,
    font_size: f32,
    highlight_fill: &'a str,
}

fn text_svg(
    x: f32,
    y: f32,
    text: &str,
    bold: bool,
    style: &TextStyle<'_>,
    highlighter: &TermHighlighter<'_>,
) -> String {
    let weight = if bold { " font-weight=\"bold\"" } else { "" };
    let mut out = format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"{}\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\"{weight}>",
        style.align.as_svg(),
        escape_xml(style.font_family),
        style.font_size,
        style.fill
    );
    for span in highlighter.spans(text) {
        match &span.definition {
            Some(definition) => out.push_str(&format!(
                "<tspan font-weight=\"bold\" fill=\"{}\"><title>{}</title>{}</tspan>",
                style.highlight_fill,
                escape_xml(definition),
                escape_xml(&span.text)
            )),
            None => out.push_str(&escape_xml(&span.text)),
        }
    }
    out.push_str("</text>");
    out
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    tracing::debug!(path = %output.display(), width = size.width(), height = size.height(), "wrote png");
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature"
    ))
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutParams;
    use crate::glossary::Glossary;
    use crate::ir::{Diagram, DiagramNode};
    use crate::layout::compute_layout;

    fn flow() -> Diagram {
        Diagram::sequence(vec![
            DiagramNode::new("Assessment", ["CMMC gap analysis"]).with_title("Assessment"),
            DiagramNode::new("Build", ["Landing zone & IAM"]),
        ])
    }

    #[test]
    fn render_svg_basic() {
        let layout =
            compute_layout(&flow(), &Theme::dark(), &LayoutParams::default()).expect("layout");
        let glossary = Glossary::new();
        let svg = render_svg(&layout, &Theme::dark(), &TermHighlighter::new(None, &glossary));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Assessment"));
        assert!(svg.contains("Landing zone &amp; IAM"));
        assert!(svg.contains("marker-end=\"url(#arrow)\""));
        assert!(!svg.contains("<tspan"));
    }

    #[test]
    fn highlighted_terms_carry_their_definition() {
        let layout =
            compute_layout(&flow(), &Theme::light(), &LayoutParams::default()).expect("layout");
        let mut glossary = Glossary::new();
        glossary.insert("CMMC", "Cybersecurity Maturity Model Certification");
        let svg = render_svg(
            &layout,
            &Theme::light(),
            &TermHighlighter::new(Some("CMMC"), &glossary),
        );
        assert!(svg.contains(
            "<tspan font-weight=\"bold\" fill=\"#B45309\"><title>Cybersecurity Maturity Model Certification</title>CMMC</tspan>"
        ));
    }

    #[test]
    fn missing_definition_uses_fallback() {
        let layout =
            compute_layout(&flow(), &Theme::dark(), &LayoutParams::default()).expect("layout");
        let glossary = Glossary::new();
        let svg = render_svg(&layout, &Theme::dark(), &TermHighlighter::new(Some("IAM"), &glossary));
        assert!(svg.contains("<title>Definition not found</title>IAM"));
    }

    #[test]
    fn tree_lines_have_no_marker() {
        let mut diagram = Diagram::new(crate::ir::Arrangement::Tree);
        diagram.nodes = vec![DiagramNode::labeled("root"), DiagramNode::labeled("leaf")];
        diagram.edges = vec![crate::ir::DiagramEdge::new("root", "leaf")];
        let layout =
            compute_layout(&diagram, &Theme::dark(), &LayoutParams::default()).expect("layout");
        let glossary = Glossary::new();
        let svg = render_svg(&layout, &Theme::dark(), &TermHighlighter::new(None, &glossary));
        assert!(svg.contains("<path d=\"M"));
        assert!(!svg.contains("url(#arrow)\" />"));
    }

    #[test]
    fn font_family_is_escaped() {
        let mut theme = Theme::dark();
        theme.font_family = "Inter\" onload=\"x".to_string();
        let layout = compute_layout(&flow(), &theme, &LayoutParams::default()).expect("layout");
        let glossary = Glossary::new();
        let svg = render_svg(&layout, &theme, &TermHighlighter::new(None, &glossary));
        assert!(svg.contains("font-family=\"Inter&quot; onload=&quot;x\""));
        assert!(!svg.contains("onload=\"x\""));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
