#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, ConfigError, LayoutConfig, PackConfig, RenderConfig, load_config};
pub use ir::{BubbleGroup, BubbleItem, TaskRecord, group_records};
pub use layout::{
    BubbleSize, DEFAULT_CANVAS_SIZE, GroupLayout, Layout, PlacedBubble, ScaleClass, SizedBubble,
    compute_layout, estimate_size, pack, pack_with_config,
};
pub use layout_dump::LayoutDump;
pub use parser::{InputError, parse_input};
pub use render::render_svg;
pub use theme::Theme;

/// Theme and layout settings for [`render_with_options`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self {
            theme: Theme::classic(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            ..Self::classic()
        }
    }

    pub fn with_canvas_size(mut self, canvas_size: f32) -> Self {
        self.layout.pack.canvas_size = canvas_size;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::modern()
    }
}

/// Parses task input, packs every group and renders the result as SVG.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    options.layout.validate()?;
    let groups = group_records(parse_input(input)?);
    let layout = compute_layout(&groups, &options.layout);
    Ok(render_svg(&layout, &options.theme, &options.layout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_line_input_end_to_end() {
        let svg = render_with_options(
            "[Staffing]\nt1: Hire new staff\nt2: Onboard\n[Finance]\nt3: Audit",
            RenderOptions::default(),
        )
        .unwrap();
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains("Finance"));
    }

    #[test]
    fn rejects_invalid_canvas() {
        let err = render_with_options("a: b", RenderOptions::classic().with_canvas_size(-1.0))
            .unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn surfaces_input_errors() {
        let err = render_with_options("{\"items\": 3", RenderOptions::default()).unwrap_err();
        assert!(err.downcast_ref::<InputError>().is_some());
    }
}
