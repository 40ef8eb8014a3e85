use crate::layout::{Layout, PlacedBubble, ScaleClass};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub canvas_size: f32,
    pub groups: Vec<GroupDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDump {
    pub name: Option<String>,
    pub overlaps: usize,
    pub bubbles: Vec<BubbleDump>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BubbleDump {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub diameter: f32,
    pub scale: ScaleClass,
    pub x: f32,
    pub y: f32,
    pub overlapped: bool,
}

impl From<&PlacedBubble> for BubbleDump {
    fn from(bubble: &PlacedBubble) -> Self {
        Self {
            id: bubble.id.clone(),
            label: bubble.label.clone(),
            diameter: bubble.diameter,
            scale: bubble.scale,
            x: bubble.x,
            y: bubble.y,
            overlapped: bubble.overlapped,
        }
    }
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let groups = layout
            .groups
            .iter()
            .map(|group| GroupDump {
                name: group.name.clone(),
                overlaps: group.overlaps,
                bubbles: group.bubbles.iter().map(BubbleDump::from).collect(),
            })
            .collect();
        LayoutDump {
            canvas_size: layout.canvas_size,
            groups,
        }
    }
}

/// Flat `[{id, label, diameter, scale, x, y, overlapped}]` list for callers
/// that pack a single group.
pub fn bubbles_to_json(bubbles: &[PlacedBubble]) -> serde_json::Result<String> {
    let dump: Vec<BubbleDump> = bubbles.iter().map(BubbleDump::from).collect();
    serde_json::to_string(&dump)
}

pub fn write_layout_dump(path: Option<&Path>, layout: &Layout) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &dump)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{BubbleGroup, BubbleItem};
    use crate::layout::{compute_layout, pack};

    #[test]
    fn dump_uses_camel_case_and_lowercase_scales() {
        let groups = vec![BubbleGroup {
            name: Some("Ops".to_string()),
            items: vec![BubbleItem::labeled("a", "Plan daily work")],
        }];
        let layout = compute_layout(&groups, &LayoutConfig::default());
        let value = serde_json::to_value(LayoutDump::from_layout(&layout)).unwrap();
        assert_eq!(value["canvasSize"], 280.0);
        assert_eq!(value["groups"][0]["name"], "Ops");
        let bubble = &value["groups"][0]["bubbles"][0];
        assert_eq!(bubble["id"], "a");
        assert_eq!(bubble["scale"], "medium");
        assert_eq!(bubble["diameter"], 80.0);
        assert_eq!(bubble["x"], 100.0);
        assert_eq!(bubble["overlapped"], false);
    }

    #[test]
    fn flat_list_omits_missing_labels() {
        let json = bubbles_to_json(&pack(&[BubbleItem::new("solo", None)], 280.0)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], "solo");
        assert!(value[0].get("label").is_none());
        assert_eq!(value[0]["diameter"], 60.0);
    }
}
