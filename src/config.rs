use crate::layout::LayoutError;
use crate::theme::Theme;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").unwrap());

/// Geometry knobs for every arrangement, in abstract canvas units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub box_width: f32,
    /// Base box height: the floor for sequences and the fixed height of tree levels.
    pub box_height: f32,
    /// Wrap width, in characters.
    pub max_text_width: usize,
    /// Gap between sibling boxes on the main axis.
    pub spacing: f32,
    /// Gap between tree levels, grid rows and Gantt bars.
    pub level_gap: f32,
    /// Fixed heights per tree depth; depths past the end use `box_height`.
    pub level_heights: Vec<f32>,
    pub line_height: f32,
    pub padding: f32,
    /// Band reserved for box titles and for column/axis headers.
    pub header_height: f32,
    /// Gutter left of grids and Gantt charts for row labels and task captions.
    pub label_width: f32,
    /// Average glyph advance, used only to estimate label extents.
    pub char_width: f32,
    pub bar_height: f32,
    pub day_width: f32,
    pub tick_interval: f32,
    pub font_size: f32,
    pub margin: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            box_width: 220.0,
            box_height: 110.0,
            max_text_width: 22,
            spacing: 60.0,
            level_gap: 40.0,
            level_heights: Vec::new(),
            line_height: 20.0,
            padding: 12.0,
            header_height: 28.0,
            label_width: 170.0,
            char_width: 7.5,
            bar_height: 28.0,
            day_width: 12.0,
            tick_interval: 7.0,
            font_size: 13.0,
            margin: 20.0,
        }
    }
}

impl LayoutParams {
    pub fn level_height(&self, depth: usize) -> f32 {
        self.level_heights
            .get(depth)
            .copied()
            .unwrap_or(self.box_height)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = [
            ("box_width", self.box_width),
            ("box_height", self.box_height),
            ("line_height", self.line_height),
            ("char_width", self.char_width),
            ("bar_height", self.bar_height),
            ("day_width", self.day_width),
            ("tick_interval", self.tick_interval),
            ("font_size", self.font_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::InvalidParams(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("spacing", self.spacing),
            ("level_gap", self.level_gap),
            ("padding", self.padding),
            ("header_height", self.header_height),
            ("label_width", self.label_width),
            ("margin", self.margin),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LayoutError::InvalidParams(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if self.max_text_width == 0 {
            return Err(LayoutError::InvalidParams(
                "max_text_width must be at least one character".to_string(),
            ));
        }
        if let Some((depth, height)) = self
            .level_heights
            .iter()
            .enumerate()
            .find(|(_, h)| !(h.is_finite() && **h > 0.0))
        {
            return Err(LayoutError::InvalidParams(format!(
                "level_heights[{depth}] must be positive, got {height}"
            )));
        }
        Ok(())
    }
}

/// Partial [`LayoutParams`] as written in config and diagram files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutParamsFile {
    pub box_width: Option<f32>,
    pub box_height: Option<f32>,
    pub max_text_width: Option<usize>,
    pub spacing: Option<f32>,
    pub level_gap: Option<f32>,
    pub level_heights: Option<Vec<f32>>,
    pub line_height: Option<f32>,
    pub padding: Option<f32>,
    pub header_height: Option<f32>,
    pub label_width: Option<f32>,
    pub char_width: Option<f32>,
    pub bar_height: Option<f32>,
    pub day_width: Option<f32>,
    pub tick_interval: Option<f32>,
    pub font_size: Option<f32>,
    pub margin: Option<f32>,
}

impl LayoutParamsFile {
    pub fn apply(&self, params: &mut LayoutParams) {
        if let Some(v) = self.box_width {
            params.box_width = v;
        }
        if let Some(v) = self.box_height {
            params.box_height = v;
        }
        if let Some(v) = self.max_text_width {
            params.max_text_width = v;
        }
        if let Some(v) = self.spacing {
            params.spacing = v;
        }
        if let Some(v) = self.level_gap {
            params.level_gap = v;
        }
        if let Some(v) = &self.level_heights {
            params.level_heights = v.clone();
        }
        if let Some(v) = self.line_height {
            params.line_height = v;
        }
        if let Some(v) = self.padding {
            params.padding = v;
        }
        if let Some(v) = self.header_height {
            params.header_height = v;
        }
        if let Some(v) = self.label_width {
            params.label_width = v;
        }
        if let Some(v) = self.char_width {
            params.char_width = v;
        }
        if let Some(v) = self.bar_height {
            params.bar_height = v;
        }
        if let Some(v) = self.day_width {
            params.day_width = v;
        }
        if let Some(v) = self.tick_interval {
            params.tick_interval = v;
        }
        if let Some(v) = self.font_size {
            params.font_size = v;
        }
        if let Some(v) = self.margin {
            params.margin = v;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#0F1720".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutParams,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_theme(Theme::dark())
    }
}

impl Config {
    pub fn with_theme(theme: Theme) -> Self {
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutParams::default(),
            render,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.render.background = theme.background.clone();
        self.theme = theme;
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    text_color: Option<String>,
    box_text_color: Option<String>,
    line_color: Option<String>,
    box_stroke: Option<String>,
    default_fill: Option<String>,
    highlight_color: Option<String>,
    palette: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    category_colors: Option<BTreeMap<String, String>>,
    layout: Option<LayoutParamsFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .map_err(|err| anyhow::anyhow!("failed to read config {}: {err}", path.display()))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::from_name(theme_name) {
            Some(theme) => config.set_theme(theme),
            None => tracing::warn!(theme = theme_name, "unknown theme name, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = checked_color("background", v)?;
            config.render.background = config.theme.background.clone();
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = checked_color("textColor", v)?;
        }
        if let Some(v) = vars.box_text_color {
            config.theme.box_text_color = checked_color("boxTextColor", v)?;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = checked_color("lineColor", v)?;
        }
        if let Some(v) = vars.box_stroke {
            config.theme.box_stroke = checked_color("boxStroke", v)?;
        }
        if let Some(v) = vars.default_fill {
            config.theme.default_fill = checked_color("defaultFill", v)?;
        }
        if let Some(v) = vars.highlight_color {
            config.theme.highlight_color = checked_color("highlightColor", v)?;
        }
        if let Some(palette) = vars.palette {
            config.theme.palette = palette
                .into_iter()
                .map(|c| checked_color("palette", c))
                .collect::<anyhow::Result<_>>()?;
        }
    }

    if let Some(colors) = parsed.category_colors {
        for (category, color) in colors {
            let color = checked_color(&category, color)?;
            config.theme.category_fills.insert(category, color);
        }
    }

    if let Some(layout) = parsed.layout {
        layout.apply(&mut config.layout);
    }
    config.layout.validate()?;

    Ok(config)
}

fn checked_color(field: &str, value: String) -> anyhow::Result<String> {
    if HEX_COLOR_RE.is_match(&value) {
        Ok(value)
    } else {
        Err(anyhow::anyhow!(
            "invalid color for {field}: {value:?} (expected #rgb or #rrggbb)"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LayoutParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_box_width() {
        let params = LayoutParams {
            box_width: 0.0,
            ..LayoutParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(LayoutError::InvalidParams(msg)) if msg.contains("box_width")
        ));
    }

    #[test]
    fn level_height_falls_back_to_box_height() {
        let params = LayoutParams {
            level_heights: vec![60.0],
            ..LayoutParams::default()
        };
        assert_eq!(params.level_height(0), 60.0);
        assert_eq!(params.level_height(3), params.box_height);
    }

    #[test]
    fn parses_theme_colors_and_layout() {
        let config = parse_config(
            r##"{
                "theme": "light",
                "themeVariables": { "highlightColor": "#FACC15" },
                "categoryColors": { "Security Engineer": "#B5E0C1" },
                "layout": { "boxWidth": 190, "maxTextWidth": 20 }
            }"##,
        )
        .expect("config should parse");
        assert_eq!(config.theme.background, "#FFFFFF");
        assert_eq!(config.render.background, "#FFFFFF");
        assert_eq!(config.theme.highlight_color, "#FACC15");
        assert_eq!(
            config.theme.category_fills.get("Security Engineer").map(String::as_str),
            Some("#B5E0C1")
        );
        assert_eq!(config.layout.box_width, 190.0);
        assert_eq!(config.layout.max_text_width, 20);
    }

    #[test]
    fn rejects_malformed_colors() {
        let err = parse_config(r#"{ "categoryColors": { "DevOps": "purple" } }"#)
            .expect_err("named colors are not accepted");
        assert!(err.to_string().contains("DevOps"));
    }

    #[test]
    fn rejects_invalid_layout_overrides() {
        assert!(parse_config(r#"{ "layout": { "lineHeight": -1 } }"#).is_err());
    }
}
