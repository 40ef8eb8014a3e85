use serde::{Deserialize, Serialize};

use crate::layout::ScaleClass;

const CLASSIC_BUBBLE_COLORS: [&str; 8] = [
    "#ECECFF", "#FFFFDE", "#E0F5E9", "#FDE2E4", "#E2ECFD", "#FFF1D6", "#EDE3FB", "#DDF3F5",
];

const MODERN_BUBBLE_COLORS: [&str; 8] = [
    "#DBEAFE", "#DCFCE7", "#FEF3C7", "#FCE7F3", "#E0E7FF", "#CCFBF1", "#FFE4E6", "#F3E8FF",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub small_font_size: f32,
    pub medium_font_size: f32,
    pub large_font_size: f32,
    pub title_font_size: f32,
    pub text_color: String,
    pub title_color: String,
    pub bubble_colors: Vec<String>,
    pub bubble_stroke: String,
    pub overlap_stroke: String,
    pub canvas_border: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            small_font_size: 10.0,
            medium_font_size: 11.0,
            large_font_size: 12.0,
            title_font_size: 14.0,
            text_color: "#333333".to_string(),
            title_color: "#333333".to_string(),
            bubble_colors: CLASSIC_BUBBLE_COLORS.iter().map(|c| c.to_string()).collect(),
            bubble_stroke: "#9370DB".to_string(),
            overlap_stroke: "#D9534F".to_string(),
            canvas_border: "#AAAA33".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            small_font_size: 10.0,
            medium_font_size: 11.0,
            large_font_size: 12.0,
            title_font_size: 13.0,
            text_color: "#1C2430".to_string(),
            title_color: "#475569".to_string(),
            bubble_colors: MODERN_BUBBLE_COLORS.iter().map(|c| c.to_string()).collect(),
            bubble_stroke: "#7A8AA6".to_string(),
            overlap_stroke: "#DC2626".to_string(),
            canvas_border: "#D7E0F0".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn font_size_for(&self, scale: ScaleClass) -> f32 {
        match scale {
            ScaleClass::Small => self.small_font_size,
            ScaleClass::Medium => self.medium_font_size,
            ScaleClass::Large => self.large_font_size,
        }
    }

    /// Fill for the `index`-th bubble of a group, in placement order. Wraps
    /// around the palette; an empty palette leaves bubbles unfilled.
    pub fn bubble_color(&self, index: usize) -> &str {
        if self.bubble_colors.is_empty() {
            return "none";
        }
        &self.bubble_colors[index % self.bubble_colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_follows_scale_class() {
        let theme = Theme::classic();
        assert_eq!(theme.font_size_for(ScaleClass::Small), 10.0);
        assert_eq!(theme.font_size_for(ScaleClass::Medium), 11.0);
        assert_eq!(theme.font_size_for(ScaleClass::Large), 12.0);
    }

    #[test]
    fn bubble_colors_wrap_around_the_palette() {
        let theme = Theme::modern();
        assert_eq!(theme.bubble_color(0), "#DBEAFE");
        assert_eq!(theme.bubble_color(9), "#DCFCE7");
    }

    #[test]
    fn empty_palette_leaves_bubbles_unfilled() {
        let mut theme = Theme::classic();
        theme.bubble_colors.clear();
        assert_eq!(theme.bubble_color(3), "none");
    }
}
