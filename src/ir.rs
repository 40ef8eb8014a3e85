use serde::{Deserialize, Serialize};

/// One labeled item to be packed. `id` is opaque to the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl BubbleItem {
    pub fn new(id: impl Into<String>, label: Option<String>) -> Self {
        Self {
            id: id.into(),
            label,
        }
    }

    pub fn labeled(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, Some(label.into()))
    }
}

/// A raw task as read from input, before grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: String,
    pub label: Option<String>,
    /// Work function the task belongs to. `None` lands in the default group.
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleGroup {
    pub name: Option<String>,
    pub items: Vec<BubbleItem>,
}

impl BubbleGroup {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            items: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Buckets records by work function. Groups appear in the order their
/// first record does, and items keep input order inside a group.
pub fn group_records(records: Vec<TaskRecord>) -> Vec<BubbleGroup> {
    let mut groups: Vec<BubbleGroup> = Vec::new();
    for record in records {
        let group = normalize_group(record.group);
        let idx = match groups.iter().position(|g| g.name == group) {
            Some(idx) => idx,
            None => {
                groups.push(BubbleGroup::new(group));
                groups.len() - 1
            }
        };
        groups[idx]
            .items
            .push(BubbleItem::new(record.id, record.label));
    }
    groups
}

fn normalize_group(group: Option<String>) -> Option<String> {
    group
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}
