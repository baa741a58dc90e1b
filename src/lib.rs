#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod glossary;
pub mod highlight;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod sprint;
pub mod table;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutParams, load_config};
pub use glossary::{DEFINITION_NOT_FOUND, Glossary};
pub use highlight::{TermHighlighter, annotate_terms, highlight};
pub use ir::{Arrangement, Diagram, DiagramEdge, DiagramNode, Direction};
pub use layout::{Layout, LayoutError, compute_layout, wrap};
pub use parser::parse_diagram;
pub use render::render_svg;
pub use sprint::{SprintBoard, SprintMetrics, SprintTask};
pub use table::ReferenceTable;
pub use theme::Theme;

/// Everything needed to turn a diagram file into SVG in one call.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutParams,
    /// Glossary term to emphasise, if any.
    pub highlight: Option<String>,
}

impl RenderOptions {
    pub fn dark() -> Self {
        Self::default()
    }

    pub fn light() -> Self {
        Self {
            theme: Theme::light(),
            ..Self::default()
        }
    }

    pub fn with_highlight(mut self, term: impl Into<String>) -> Self {
        self.highlight = Some(term.into());
        self
    }
}

pub fn render(input: &str) -> anyhow::Result<String> {
    render_with_options(input, RenderOptions::default())
}

/// Parses, lays out and renders a JSON5 diagram; layout overrides in the file win over `options`.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let parsed = parse_diagram(input)?;
    let mut params = options.layout;
    if let Some(overrides) = &parsed.layout {
        overrides.apply(&mut params);
    }
    let layout = compute_layout(&parsed.diagram, &options.theme, &params)?;
    let highlighter = TermHighlighter::new(options.highlight.as_deref(), &parsed.diagram.glossary);
    Ok(render_svg(&layout, &options.theme, &highlighter))
}
