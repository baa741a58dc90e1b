use dashboard_diagrams::{RenderOptions, Theme, render_with_options};
use serde::Deserialize;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagramRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    highlight: Option<String>,
    category_colors: Option<BTreeMap<String, String>>,
}

fn build_render_options(options: DiagramRenderOptions) -> RenderOptions {
    let mut render_options = RenderOptions {
        theme: options
            .theme
            .as_deref()
            .and_then(Theme::from_name)
            .unwrap_or_default(),
        ..RenderOptions::default()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.layout.font_size = font_size;
    }
    if let Some(colors) = options.category_colors {
        render_options.theme.category_fills.extend(colors);
    }
    render_options.highlight = options.highlight;

    render_options
}

#[wasm_bindgen]
pub fn render_diagram_svg(code: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<DiagramRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        DiagramRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(code, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}
