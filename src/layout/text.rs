use std::borrow::Cow;

use crate::config::LayoutConfig;
use crate::theme::Theme;

use super::PlacedBubble;

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub font_size: f32,
    pub height: f32,
}

/// Cuts `label` to `max_chars` characters and appends an ellipsis.
pub fn display_label(label: &str, max_chars: usize) -> Cow<'_, str> {
    match label.char_indices().nth(max_chars) {
        None => Cow::Borrowed(label),
        Some((cut, _)) => {
            let mut short = label[..cut].trim_end().to_string();
            short.push(ELLIPSIS);
            Cow::Owned(short)
        }
    }
}

/// Lays out the display label of `bubble` as centered lines that fit the
/// circle's width minus padding.
pub fn bubble_label(bubble: &PlacedBubble, theme: &Theme, config: &LayoutConfig) -> TextBlock {
    let font_size = theme.font_size_for(bubble.scale);
    let text = bubble
        .label
        .as_deref()
        .map(|label| display_label(label, config.label_max_chars))
        .unwrap_or(Cow::Borrowed(""));
    let max_width = (bubble.diameter - config.label_padding * 2.0).max(font_size);
    let lines = wrap_label(&text, max_width, font_size);
    let height = lines.len() as f32 * font_size * config.label_line_height;
    TextBlock {
        lines,
        font_size,
        height,
    }
}

/// Greedy word wrap. A word wider than `max_width` gets a line of its own
/// rather than being split.
pub fn wrap_label(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate_width = text_width(&current, font_size)
            + text_width(" ", font_size)
            + text_width(word, font_size);
        if candidate_width <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

// Rough advance widths for a sans-serif face, in ems.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.306,
        'i' | 'j' | 'l' | '\'' | '|' | '!' | '.' | ',' | ':' | ';' => 0.25,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' => 0.34,
        'm' | 'w' => 0.84,
        'M' | 'W' => 0.93,
        'A'..='Z' => 0.66,
        'a'..='z' => 0.56,
        '0'..='9' => 0.55,
        ELLIPSIS => 0.8,
        _ if ch.is_ascii() => 0.5,
        _ => 0.62,
    }
}
