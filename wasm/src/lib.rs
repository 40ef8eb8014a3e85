use radial_bubbles::layout_dump::bubbles_to_json;
use radial_bubbles::{BubbleItem, DEFAULT_CANVAS_SIZE, RenderOptions, pack, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BubbleRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    canvas_size: Option<f32>,
    highlight_overlaps: Option<bool>,
}

fn build_render_options(options: BubbleRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("classic") {
        RenderOptions::classic()
    } else {
        RenderOptions::modern()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(canvas_size) = options.canvas_size {
        render_options = render_options.with_canvas_size(canvas_size);
    }
    if let Some(highlight) = options.highlight_overlaps {
        render_options.layout.highlight_overlaps = highlight;
    }

    render_options
}

/// Packs `[{id, label?}]` and returns `[{id, label?, diameter, scale, x, y, overlapped}]`.
#[wasm_bindgen]
pub fn pack_bubbles(items_json: &str, canvas_size: Option<f32>) -> Result<String, JsValue> {
    let items: Vec<BubbleItem> =
        serde_json::from_str(items_json).map_err(|error| JsValue::from_str(&error.to_string()))?;
    let placed = pack(&items, canvas_size.unwrap_or(DEFAULT_CANVAS_SIZE));
    bubbles_to_json(&placed).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn render_bubbles_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<BubbleRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        BubbleRenderOptions::default()
    };

    render_with_options(input, build_render_options(options))
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
