use crate::layout::DEFAULT_CANVAS_SIZE;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("canvas size must be positive, got {0}")]
    CanvasSize(f32),
    #[error("maxAttempts must be at least 1")]
    MaxAttempts,
    #[error("ring slack must be positive, got {0}")]
    RingSlack(f32),
    #[error("label max chars must be at least 1")]
    LabelMaxChars,
}

/// Constants of the ring packer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackConfig {
    pub canvas_size: f32,
    /// Gap between consecutive rings.
    pub ring_gap: f32,
    /// Angular slack per bubble when deciding how many fit on a ring.
    pub ring_slack: f32,
    pub min_ring_slots: usize,
    pub max_attempts: usize,
    /// Radians added to a slot's angle on every retry.
    pub attempt_jitter: f32,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            ring_gap: 20.0,
            ring_slack: 1.3,
            min_ring_slots: 6,
            max_attempts: 10,
            attempt_jitter: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub pack: PackConfig,
    pub label_max_chars: usize,
    pub label_padding: f32,
    pub label_line_height: f32,
    pub group_gap: f32,
    pub group_title_height: f32,
    pub highlight_overlaps: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pack: PackConfig::default(),
            label_max_chars: 30,
            label_padding: 8.0,
            label_line_height: 1.2,
            group_gap: 24.0,
            group_title_height: 28.0,
            highlight_overlaps: false,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pack.canvas_size.is_nan() || self.pack.canvas_size <= 0.0 {
            return Err(ConfigError::CanvasSize(self.pack.canvas_size));
        }
        if self.pack.max_attempts == 0 {
            return Err(ConfigError::MaxAttempts);
        }
        if self.pack.ring_slack.is_nan() || self.pack.ring_slack <= 0.0 {
            return Err(ConfigError::RingSlack(self.pack.ring_slack));
        }
        if self.label_max_chars == 0 {
            return Err(ConfigError::LabelMaxChars);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::classic(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size_small: Option<f32>,
    font_size_medium: Option<f32>,
    font_size_large: Option<f32>,
    title_font_size: Option<f32>,
    text_color: Option<String>,
    title_color: Option<String>,
    bubble_colors: Option<Vec<String>>,
    bubble_stroke: Option<String>,
    overlap_stroke: Option<String>,
    canvas_border: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    canvas_size: Option<f32>,
    ring_gap: Option<f32>,
    ring_slack: Option<f32>,
    min_ring_slots: Option<usize>,
    max_attempts: Option<usize>,
    attempt_jitter: Option<f32>,
    label_max_chars: Option<usize>,
    label_padding: Option<f32>,
    label_line_height: Option<f32>,
    group_gap: Option<f32>,
    group_title_height: Option<f32>,
    highlight_overlaps: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a config document (JSON, or JSON5 as a fallback) on top of the
/// defaults and validates the result.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .map_err(|_| anyhow::anyhow!("invalid config file: {json_err}"))?,
    };

    let mut config = Config::default();
    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" | "base" => config.theme = Theme::classic(),
            other => log::warn!("unknown theme {other:?}, keeping the default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
    }
    if let Some(layout) = parsed.layout {
        apply_layout(&mut config.layout, layout);
    }
    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
    }

    config.layout.validate()?;
    Ok(config)
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.font_size_small {
        theme.small_font_size = v;
    }
    if let Some(v) = vars.font_size_medium {
        theme.medium_font_size = v;
    }
    if let Some(v) = vars.font_size_large {
        theme.large_font_size = v;
    }
    if let Some(v) = vars.title_font_size {
        theme.title_font_size = v;
    }
    if let Some(v) = vars.text_color {
        theme.text_color = v;
    }
    if let Some(v) = vars.title_color {
        theme.title_color = v;
    }
    if let Some(v) = vars.bubble_colors.filter(|colors| !colors.is_empty()) {
        theme.bubble_colors = v;
    }
    if let Some(v) = vars.bubble_stroke {
        theme.bubble_stroke = v;
    }
    if let Some(v) = vars.overlap_stroke {
        theme.overlap_stroke = v;
    }
    if let Some(v) = vars.canvas_border {
        theme.canvas_border = v;
    }
    if let Some(v) = vars.background {
        theme.background = v;
    }
}

fn apply_layout(layout: &mut LayoutConfig, file: LayoutConfigFile) {
    let pack = &mut layout.pack;
    if let Some(v) = file.canvas_size {
        pack.canvas_size = v;
    }
    if let Some(v) = file.ring_gap {
        pack.ring_gap = v;
    }
    if let Some(v) = file.ring_slack {
        pack.ring_slack = v;
    }
    if let Some(v) = file.min_ring_slots {
        pack.min_ring_slots = v;
    }
    if let Some(v) = file.max_attempts {
        pack.max_attempts = v;
    }
    if let Some(v) = file.attempt_jitter {
        pack.attempt_jitter = v;
    }
    if let Some(v) = file.label_max_chars {
        layout.label_max_chars = v;
    }
    if let Some(v) = file.label_padding {
        layout.label_padding = v;
    }
    if let Some(v) = file.label_line_height {
        layout.label_line_height = v;
    }
    if let Some(v) = file.group_gap {
        layout.group_gap = v;
    }
    if let Some(v) = file.group_title_height {
        layout.group_title_height = v;
    }
    if let Some(v) = file.highlight_overlaps {
        layout.highlight_overlaps = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_packer_constants() {
        let config = Config::default();
        assert_eq!(config.layout.pack.canvas_size, 280.0);
        assert_eq!(config.layout.pack.ring_gap, 20.0);
        assert_eq!(config.layout.pack.max_attempts, 10);
        assert_eq!(config.layout.label_max_chars, 30);
        assert!(config.layout.validate().is_ok());
    }

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.pack, PackConfig::default());
    }

    #[test]
    fn parses_camel_case_overrides() {
        let config = parse_config(
            r##"{
                "theme": "modern",
                "themeVariables": { "fontSizeLarge": 14, "bubbleColors": ["#111111"], "background": "#000000" },
                "layout": { "canvasSize": 360, "maxAttempts": 4, "highlightOverlaps": true },
                "render": { "width": 640 }
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.large_font_size, 14.0);
        assert_eq!(config.theme.bubble_colors, ["#111111"]);
        assert_eq!(config.theme.background, "#000000");
        assert_eq!(config.layout.pack.canvas_size, 360.0);
        assert_eq!(config.layout.pack.max_attempts, 4);
        assert_eq!(config.layout.pack.ring_gap, 20.0);
        assert!(config.layout.highlight_overlaps);
        assert_eq!(config.render.width, 640.0);
        assert_eq!(config.theme.text_color, Theme::modern().text_color);
    }

    #[test]
    fn accepts_json5() {
        let config = parse_config("{ layout: { canvasSize: 320, }, // trailing comma\n }").unwrap();
        assert_eq!(config.layout.pack.canvas_size, 320.0);
    }

    #[test]
    fn rejects_non_positive_canvas() {
        let err = parse_config(r#"{ "layout": { "canvasSize": 0 } }"#).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::CanvasSize(0.0))
        );
    }

    #[test]
    fn validate_rejects_zero_attempts_and_nan_slack() {
        let mut layout = LayoutConfig::default();
        layout.pack.max_attempts = 0;
        assert_eq!(layout.validate(), Err(ConfigError::MaxAttempts));
        layout.pack.max_attempts = 3;
        layout.pack.ring_slack = f32::NAN;
        assert!(matches!(layout.validate(), Err(ConfigError::RingSlack(_))));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = parse_config(r#"{ "flowchart": { "curve": "basis" } }"#).unwrap();
        assert_eq!(config.layout.pack.canvas_size, 280.0);
    }
}
