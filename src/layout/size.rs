use serde::{Deserialize, Serialize};

/// Text scale bucket used by renderers to pick a label font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleClass {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleSize {
    pub diameter: f32,
    pub scale: ScaleClass,
}

impl BubbleSize {
    const fn new(diameter: f32, scale: ScaleClass) -> Self {
        Self { diameter, scale }
    }
}

pub const MIN_DIAMETER: f32 = 60.0;
pub const LONG_LABEL_DIAMETER: f32 = 94.0;
pub const MEDIUM_DIAMETER: f32 = 80.0;
pub const MAX_DIAMETER: f32 = 100.0;

/// Labels longer than this are reported in the long-label bucket.
pub const LONG_LABEL_CHARS: usize = 30;

/// Maps a label to its bubble size.
///
/// Rules are checked in order and the first match wins, so a short label
/// with few words never reaches the wider buckets:
///
/// | rule | condition                        | diameter | scale  |
/// |------|----------------------------------|----------|--------|
/// | 1    | missing or empty                 | 60       | small  |
/// | 2    | more than 30 chars               | 94       | small  |
/// | 3    | ≤ 2 words and ≤ 10 chars         | 60       | small  |
/// | 4    | ≤ 4 words and ≤ 20 chars         | 80       | medium |
/// | 5    | anything else                    | 100      | large  |
pub fn estimate_size(label: Option<&str>) -> BubbleSize {
    let Some(label) = label.filter(|text| !text.is_empty()) else {
        return BubbleSize::new(MIN_DIAMETER, ScaleClass::Small);
    };
    let char_count = label.chars().count();
    let word_count = label.split_whitespace().count();

    if char_count > LONG_LABEL_CHARS {
        BubbleSize::new(LONG_LABEL_DIAMETER, ScaleClass::Small)
    } else if word_count <= 2 && char_count <= 10 {
        BubbleSize::new(MIN_DIAMETER, ScaleClass::Small)
    } else if word_count <= 4 && char_count <= 20 {
        BubbleSize::new(MEDIUM_DIAMETER, ScaleClass::Medium)
    } else {
        BubbleSize::new(MAX_DIAMETER, ScaleClass::Large)
    }
}
