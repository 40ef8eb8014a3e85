//! Bubble layout: sizing, ring packing, and per-group assembly.
//!
//! [`pack`] is the pure engine: a list of items in, a list of placed circles
//! out, with no state carried between calls. [`compute_layout`] runs it once
//! per work-function group for the renderers.

mod radial;
mod size;
pub mod text;
mod types;

pub use radial::{DEFAULT_CANVAS_SIZE, pack, pack_with_config};
pub use size::{
    BubbleSize, LONG_LABEL_CHARS, LONG_LABEL_DIAMETER, MAX_DIAMETER, MEDIUM_DIAMETER,
    MIN_DIAMETER, ScaleClass, estimate_size,
};
pub use text::TextBlock;
pub use types::{GroupLayout, Layout, PlacedBubble, SizedBubble};

use crate::config::LayoutConfig;
use crate::ir::BubbleGroup;

pub fn compute_layout(groups: &[BubbleGroup], config: &LayoutConfig) -> Layout {
    let groups = groups
        .iter()
        .map(|group| {
            let bubbles = pack_with_config(&group.items, &config.pack);
            let overlaps = bubbles.iter().filter(|bubble| bubble.overlapped).count();
            if overlaps > 0 {
                log::warn!(
                    "group {:?}: {overlaps} of {} bubbles overlap on a {} canvas",
                    group.display_name(),
                    bubbles.len(),
                    config.pack.canvas_size
                );
            }
            GroupLayout {
                name: group.name.clone(),
                bubbles,
                overlaps,
            }
        })
        .collect();

    Layout {
        canvas_size: config.pack.canvas_size,
        groups,
    }
}
