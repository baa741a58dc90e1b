use crate::config::{Config, load_config};
use crate::highlight::TermHighlighter;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_diagram;
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::theme::Theme;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dashdiag", version, about = "Dashboard diagram layout and rendering")]
pub struct Args {
    /// Input diagram (.json5), Markdown with ```diagram blocks, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, categoryColors, layout)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Built-in theme; replaces the config file's theme but keeps its category colours
    #[arg(short = 't', long = "theme", value_enum)]
    pub theme: Option<ThemeName>,

    /// Glossary term to emphasise wherever it appears
    #[arg(long = "highlight")]
    pub highlight: Option<String>,

    /// Width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Dark,
    Light,
}

impl ThemeName {
    fn theme(self) -> Theme {
        match self {
            ThemeName::Dark => Theme::dark(),
            ThemeName::Light => Theme::light(),
        }
    }
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut base_config = load_config(args.config.as_deref())?;
    if let Some(name) = args.theme {
        let mut theme = name.theme();
        theme.category_fills = base_config.theme.category_fills.clone();
        base_config.set_theme(theme);
    }
    base_config.render.width = args.width;
    base_config.render.height = args.height;

    let (input, is_markdown) = read_input(args.input.as_deref())?;
    let diagrams = if is_markdown {
        extract_diagram_blocks(&input)
    } else {
        vec![input]
    };

    if diagrams.is_empty() {
        return Err(anyhow::anyhow!("No diagrams found in input"));
    }

    if diagrams.len() == 1 {
        let output = match args.output_format {
            OutputFormat::Png => Some(ensure_output(&args.output, "png")?),
            OutputFormat::Svg | OutputFormat::Json => args.output.clone(),
        };
        return render_one(&diagrams[0], &base_config, &args, output.as_deref());
    }

    // Multiple diagrams (Markdown input)
    let outputs = resolve_multi_outputs(args.output.as_deref(), args.output_format, diagrams.len())?;
    for (source, output) in diagrams.iter().zip(&outputs) {
        render_one(source, &base_config, &args, Some(output))?;
    }
    tracing::info!(count = outputs.len(), "rendered markdown diagrams");

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when the CLI is driven from tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn render_one(source: &str, base: &Config, args: &Args, output: Option<&Path>) -> Result<()> {
    let parsed = parse_diagram(source)?;
    let mut params = base.layout.clone();
    if let Some(overrides) = &parsed.layout {
        overrides.apply(&mut params);
    }
    let layout = compute_layout(&parsed.diagram, &base.theme, &params)?;

    if args.output_format == OutputFormat::Json {
        return write_layout_dump(output, &layout, &parsed.diagram);
    }
    let highlighter = TermHighlighter::new(args.highlight.as_deref(), &parsed.diagram.glossary);
    let svg = render_svg(&layout, &base.theme, &highlighter);
    match (args.output_format, output) {
        (OutputFormat::Png, Some(path)) => write_output_png(&svg, path, &base.render),
        (OutputFormat::Png, None) => Err(anyhow::anyhow!("Output path required for png output")),
        _ => write_output_svg(&svg, output),
    }
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, false));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|err| anyhow::anyhow!("failed to read {}: {err}", path.display()))?;
        let is_md = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| matches!(ext, "md" | "markdown"))
            .unwrap_or(false);
        return Ok((content, is_md));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, false))
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn extract_diagram_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut current = Vec::new();
    let mut fence = String::new();

    for line in input.lines() {
        let trimmed = line.trim();
        if !in_block {
            if let Some(start_fence) = detect_diagram_fence(trimmed) {
                in_block = true;
                fence = start_fence;
                continue;
            }
        } else if is_fence_end(trimmed, &fence) {
            in_block = false;
            blocks.push(current.join("\n"));
            current.clear();
            continue;
        }

        if in_block {
            current.push(line.to_string());
        }
    }

    blocks
}

fn detect_diagram_fence(line: &str) -> Option<String> {
    for marker in ["```", "~~~"] {
        if let Some(rest) = line.strip_prefix(marker) {
            let info = rest.trim_start_matches(&marker[..1]).trim();
            if info.starts_with("diagram") || info.starts_with("dashdiag") {
                return Some(marker.to_string());
            }
        }
    }
    None
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    if !line.starts_with(fence) {
        return false;
    }
    line[fence.len()..].trim().is_empty()
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for markdown input"))?;
    if base.is_dir() {
        return Ok((1..=count)
            .map(|idx| base.join(format!("diagram-{idx}.{ext}")))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("diagram");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((1..=count)
        .map(|idx| parent.join(format!("{stem}-{idx}.{ext}")))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_diagram_blocks() {
        let input = r#"
# Migration plan
``` diagram
{ nodes: ["Assessment", "Design"] }
```
notes
~~~dashdiag
{ arrangement: "tree", nodes: ["WBS"] }
~~~
```rust
fn ignored() {}
```
"#;
        let blocks = extract_diagram_blocks(input);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("Assessment"));
        assert!(blocks[1].contains("tree"));
    }

    #[test]
    fn multi_outputs_number_each_diagram() {
        let outputs =
            resolve_multi_outputs(Some(Path::new("out/plan.svg")), OutputFormat::Json, 2)
                .expect("outputs");
        assert_eq!(
            outputs,
            vec![PathBuf::from("out/plan-1.json"), PathBuf::from("out/plan-2.json")]
        );
        assert!(resolve_multi_outputs(None, OutputFormat::Svg, 2).is_err());
    }

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "dashdiag",
            "-i",
            "flow.json5",
            "-e",
            "json",
            "-t",
            "light",
            "--highlight",
            "CMMC",
        ])
        .expect("args");
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.theme, Some(ThemeName::Light));
        assert_eq!(args.highlight.as_deref(), Some("CMMC"));
        assert_eq!(args.width, 1200.0);
    }
}
