use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const PHASE_PALETTE: [&str; 6] = [
    "#4C72B0", "#55A868", "#C44E52", "#8172B2", "#CCB974", "#64B5CD",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub text_color: String,
    pub box_text_color: String,
    pub line_color: String,
    pub box_stroke: String,
    pub default_fill: String,
    pub highlight_color: String,
    /// Explicit category -> fill overrides.
    pub category_fills: BTreeMap<String, String>,
    /// Fills handed out, in first-seen order, to categories without an override.
    pub palette: Vec<String>,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#0F1720".to_string(),
            text_color: "#FFFFFF".to_string(),
            box_text_color: "#FFFFFF".to_string(),
            line_color: "#E2E8F0".to_string(),
            box_stroke: "#5FA8FF".to_string(),
            default_fill: "#1A365D".to_string(),
            highlight_color: "#FACC15".to_string(),
            category_fills: BTreeMap::new(),
            palette: PHASE_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            text_color: "#0B2540".to_string(),
            box_text_color: "#0B2540".to_string(),
            line_color: "#1E293B".to_string(),
            box_stroke: "#1F77B4".to_string(),
            default_fill: "#A9C6EA".to_string(),
            highlight_color: "#B45309".to_string(),
            category_fills: BTreeMap::new(),
            palette: PHASE_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Resolves fills for one layout pass so unknown categories get stable palette slots.
#[derive(Debug)]
pub(crate) struct FillResolver<'a> {
    theme: &'a Theme,
    assigned: BTreeMap<String, usize>,
}

impl<'a> FillResolver<'a> {
    pub(crate) fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            assigned: BTreeMap::new(),
        }
    }

    pub(crate) fn fill_for(&mut self, category: Option<&str>) -> String {
        let Some(category) = category else {
            return self.theme.default_fill.clone();
        };
        if let Some(fill) = self.theme.category_fills.get(category) {
            return fill.clone();
        }
        if self.theme.palette.is_empty() {
            return self.theme.default_fill.clone();
        }
        let next = self.assigned.len();
        let slot = *self.assigned.entry(category.to_string()).or_insert(next);
        self.theme.palette[slot % self.theme.palette.len()].clone()
    }
}
