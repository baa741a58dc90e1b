use crate::config::LayoutParams;

use super::PlacedLine;

/// Greedy word wrap measured in characters.
///
/// Explicit newlines start new paragraphs and a blank paragraph yields one
/// empty line. A word longer than `max_width` is kept whole on its own line.
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        let mut current_len = 0usize;
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if current.is_empty() {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= max_width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_len = word_len;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Wraps each source line and concatenates the result; never returns an empty list.
pub fn wrap_all<S: AsRef<str>>(lines: &[S], max_width: usize) -> Vec<String> {
    let mut out: Vec<String> = lines
        .iter()
        .flat_map(|line| wrap(line.as_ref(), max_width))
        .collect();
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn title_band(has_title: bool, params: &LayoutParams) -> f32 {
    if has_title { params.header_height } else { 0.0 }
}

/// Smallest box height that shows `line_count` lines without clipping.
pub(super) fn content_height(line_count: usize, has_title: bool, params: &LayoutParams) -> f32 {
    params.padding * 2.0
        + title_band(has_title, params)
        + line_count.max(1) as f32 * params.line_height
}

pub(super) fn title_line(title: &str, params: &LayoutParams) -> PlacedLine {
    PlacedLine {
        text: title.to_string(),
        offset: params.padding + params.header_height / 2.0,
    }
}

/// Spreads lines evenly over the box height left after padding and title band.
pub(super) fn distribute(
    lines: &[String],
    height: f32,
    has_title: bool,
    params: &LayoutParams,
) -> Vec<PlacedLine> {
    let top = params.padding + title_band(has_title, params);
    let usable = (height - top - params.padding).max(0.0);
    let step = usable / lines.len().max(1) as f32;
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| PlacedLine {
            text: line.clone(),
            offset: top + (idx as f32 + 0.5) * step,
        })
        .collect()
}

/// Stacks lines from the top of the box at `line_height` pitch.
pub(super) fn stack_top(lines: &[String], has_title: bool, params: &LayoutParams) -> Vec<PlacedLine> {
    let top = params.padding + title_band(has_title, params);
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| PlacedLine {
            text: line.clone(),
            offset: top + (idx as f32 + 0.5) * params.line_height,
        })
        .collect()
}
