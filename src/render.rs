use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::text::bubble_label;
use crate::layout::{GroupLayout, Layout, PlacedBubble, TextBlock};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Total drawing size: groups side by side, each on its own canvas.
pub fn layout_size(layout: &Layout, config: &LayoutConfig) -> (f32, f32) {
    let count = layout.groups.len().max(1) as f32;
    let width = count * layout.canvas_size + (count - 1.0) * config.group_gap;
    let height = layout.canvas_size + title_band(layout, config);
    (width.max(1.0), height.max(1.0))
}

fn title_band(layout: &Layout, config: &LayoutConfig) -> f32 {
    if layout.groups.iter().any(|group| group.name.is_some()) {
        config.group_title_height
    } else {
        0.0
    }
}

pub fn render_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig) -> String {
    let (width, height) = layout_size(layout, config);
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">"
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    let band = title_band(layout, config);
    for (idx, group) in layout.groups.iter().enumerate() {
        let offset_x = idx as f32 * (layout.canvas_size + config.group_gap);
        render_group(&mut svg, group, offset_x, band, layout.canvas_size, theme, config);
    }

    svg.push_str("</svg>");
    svg
}

fn render_group(
    svg: &mut String,
    group: &GroupLayout,
    offset_x: f32,
    offset_y: f32,
    canvas: f32,
    theme: &Theme,
    config: &LayoutConfig,
) {
    svg.push_str(&format!(
        "<g class=\"bubble-group\" transform=\"translate({offset_x:.2},0)\">"
    ));
    if let Some(name) = group.name.as_deref() {
        svg.push_str(&format!(
            "<text class=\"group-title\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"600\" fill=\"{}\">{}</text>",
            canvas / 2.0,
            offset_y / 2.0 + theme.title_font_size / 2.0,
            escape_xml(&theme.font_family),
            theme.title_font_size,
            escape_xml(&theme.title_color),
            escape_xml(name)
        ));
    }
    svg.push_str(&format!(
        "<rect x=\"0\" y=\"{offset_y:.2}\" width=\"{canvas:.2}\" height=\"{canvas:.2}\" rx=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-dasharray=\"6 4\" stroke-width=\"1\"/>",
        canvas / 2.0,
        escape_xml(&theme.canvas_border)
    ));

    for (idx, bubble) in group.bubbles.iter().enumerate() {
        render_bubble(svg, bubble, idx, offset_y, theme, config);
    }
    svg.push_str("</g>");
}

fn render_bubble(
    svg: &mut String,
    bubble: &PlacedBubble,
    index: usize,
    offset_y: f32,
    theme: &Theme,
    config: &LayoutConfig,
) {
    let (cx, cy) = bubble.center();
    let cy = cy + offset_y;
    svg.push_str(&format!(
        "<g class=\"bubble\" data-id=\"{}\">",
        escape_xml(&bubble.id)
    ));
    if let Some(label) = bubble.label.as_deref() {
        svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
    }

    let (stroke, dash) = if bubble.overlapped && config.highlight_overlaps {
        (theme.overlap_stroke.as_str(), " stroke-dasharray=\"4 3\"")
    } else {
        (theme.bubble_stroke.as_str(), "")
    };
    svg.push_str(&format!(
        "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.2\"{dash}/>",
        bubble.radius(),
        escape_xml(theme.bubble_color(index)),
        escape_xml(stroke)
    ));

    let label = bubble_label(bubble, theme, config);
    svg.push_str(&text_block_svg(cx, cy, &label, theme, config));
    svg.push_str("</g>");
}

fn text_block_svg(x: f32, y: f32, label: &TextBlock, theme: &Theme, config: &LayoutConfig) -> String {
    if label.lines.is_empty() {
        return String::new();
    }
    let line_step = label.font_size * config.label_line_height;
    let start_y = y - label.height / 2.0 + label.font_size * 0.9;
    let mut text = String::new();
    text.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
        escape_xml(&theme.font_family),
        label.font_size,
        escape_xml(&theme.text_color)
    ));
    for (idx, line) in label.lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_step };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid render size {}x{}", render_cfg.width, render_cfg.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
