use crate::ir::BubbleItem;

use super::size::{ScaleClass, estimate_size};

#[derive(Debug, Clone, PartialEq)]
pub struct SizedBubble {
    pub id: String,
    pub label: Option<String>,
    pub diameter: f32,
    pub scale: ScaleClass,
}

impl SizedBubble {
    pub fn from_item(item: &BubbleItem) -> Self {
        let size = estimate_size(item.label.as_deref());
        Self {
            id: item.id.clone(),
            label: item.label.clone(),
            diameter: size.diameter,
            scale: size.scale,
        }
    }

    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }

    pub(super) fn into_placed(self, x: f32, y: f32, overlapped: bool) -> PlacedBubble {
        PlacedBubble {
            id: self.id,
            label: self.label,
            diameter: self.diameter,
            scale: self.scale,
            x,
            y,
            overlapped,
        }
    }
}

/// A bubble with its final position. `x`/`y` is the top-left corner of the
/// circle's bounding box in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBubble {
    pub id: String,
    pub label: Option<String>,
    pub diameter: f32,
    pub scale: ScaleClass,
    pub x: f32,
    pub y: f32,
    /// Set when the packer ran out of attempts (or clamping pushed the
    /// circle back) and the bubble intersects one placed before it.
    pub overlapped: bool,
}

impl PlacedBubble {
    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.radius(), self.y + self.radius())
    }

    pub fn intersects(&self, other: &PlacedBubble) -> bool {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        circles_intersect(ax, ay, self.diameter, bx, by, other.diameter)
    }
}

pub(super) fn circles_intersect(
    ax: f32,
    ay: f32,
    a_diameter: f32,
    bx: f32,
    by: f32,
    b_diameter: f32,
) -> bool {
    (ax - bx).hypot(ay - by) < (a_diameter + b_diameter) / 2.0
}

/// Placements for one group of bubbles on its own canvas.
#[derive(Debug, Clone)]
pub struct GroupLayout {
    pub name: Option<String>,
    pub bubbles: Vec<PlacedBubble>,
    pub overlaps: usize,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub canvas_size: f32,
    pub groups: Vec<GroupLayout>,
}

impl Layout {
    pub fn bubble_count(&self) -> usize {
        self.groups.iter().map(|group| group.bubbles.len()).sum()
    }

    pub fn total_overlaps(&self) -> usize {
        self.groups.iter().map(|group| group.overlaps).sum()
    }
}
