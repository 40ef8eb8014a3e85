use crate::ir::TaskRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

static SECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(?P<group>[^\]]*)\]$").unwrap());
static RECORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\[(?P<group>[^\]]*)\]\s*)?(?P<id>[^\s:\[\]]+)\s*(?::\s*(?P<label>.*))?$")
        .unwrap()
});

const LABEL_KEYS: [&str; 3] = ["label", "name", "title"];
const GROUP_KEYS: [&str; 3] = ["group", "workFunction", "criticalWorkFunction"];
const LIST_KEYS: [&str; 2] = ["items", "tasks"];

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("invalid JSON input: {0}")]
    Json(String),
    #[error("line {line}: cannot read a record from {content:?}")]
    Line { line: usize, content: String },
    #[error("record {index}: expected an object or a string")]
    InvalidRecord { index: usize },
    #[error("record {index} has no id")]
    MissingId { index: usize },
    #[error("duplicate id {id:?} in group {group:?}")]
    DuplicateId { id: String, group: String },
}

/// Reads task records from JSON, JSON5, or the line format:
///
/// ```text
/// # comment
/// [Staffing]
/// t1: Hire new staff
/// [Finance] t2: Audit
/// t3
/// ```
///
/// A bare `[group]` line applies to the records after it; a `[group]`
/// prefix applies to its own line only.
pub fn parse_input(input: &str) -> Result<Vec<TaskRecord>, InputError> {
    let trimmed = input.trim_start_matches('\u{feff}').trim();
    let records = if trimmed.starts_with('{') || trimmed.starts_with("//") || trimmed.starts_with("/*")
    {
        parse_json_records(trimmed)?
    } else if trimmed.starts_with('[') {
        // `[group]` lines look like the start of a JSON array.
        match parse_json_records(trimmed) {
            Ok(records) => records,
            Err(json_err @ InputError::Json(_)) => {
                parse_line_records(trimmed).map_err(|_| json_err)?
            }
            Err(err) => return Err(err),
        }
    } else {
        parse_line_records(trimmed)?
    };
    check_duplicates(&records)?;
    Ok(records)
}

fn parse_json_records(input: &str) -> Result<Vec<TaskRecord>, InputError> {
    let value: Value = match serde_json::from_str(input) {
        Ok(value) => value,
        Err(json_err) => {
            json5::from_str(input).map_err(|_| InputError::Json(json_err.to_string()))?
        }
    };

    match value {
        Value::Array(entries) => records_from_array(&entries, None),
        Value::Object(map) => {
            if let Some(entries) = LIST_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
            {
                return records_from_array(entries, None);
            }
            let mut records = Vec::new();
            for (group, entries) in &map {
                let Some(entries) = entries.as_array() else {
                    return Err(InputError::Json(format!(
                        "group {group:?} must map to an array of records"
                    )));
                };
                let offset = records.len();
                let mut grouped = records_from_array(entries, Some(group.as_str()))
                    .map_err(|err| reindex(err, offset))?;
                records.append(&mut grouped);
            }
            Ok(records)
        }
        _ => Err(InputError::Json(
            "expected an array of records or an object".to_string(),
        )),
    }
}

fn reindex(err: InputError, offset: usize) -> InputError {
    match err {
        InputError::InvalidRecord { index } => InputError::InvalidRecord {
            index: index + offset,
        },
        InputError::MissingId { index } => InputError::MissingId {
            index: index + offset,
        },
        other => other,
    }
}

fn records_from_array(
    entries: &[Value],
    group: Option<&str>,
) -> Result<Vec<TaskRecord>, InputError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::String(label) => Ok(TaskRecord {
                id: (index + 1).to_string(),
                label: Some(label.clone()),
                group: normalize_group(group),
            }),
            Value::Object(fields) => record_from_object(index, fields, group),
            _ => Err(InputError::InvalidRecord { index }),
        })
        .collect()
}

fn record_from_object(
    index: usize,
    fields: &Map<String, Value>,
    default_group: Option<&str>,
) -> Result<TaskRecord, InputError> {
    let id = match fields.get("id") {
        Some(Value::String(id)) => id.trim().to_string(),
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    };
    if id.is_empty() {
        return Err(InputError::MissingId { index });
    }
    let label = LABEL_KEYS
        .iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::to_string);
    let group = GROUP_KEYS
        .iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .or(default_group);
    Ok(TaskRecord {
        id,
        label,
        group: normalize_group(group),
    })
}

fn parse_line_records(input: &str) -> Result<Vec<TaskRecord>, InputError> {
    let mut records = Vec::new();
    let mut section: Option<String> = None;
    for (idx, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(caps) = SECTION_RE.captures(line) {
            section = normalize_group(caps.name("group").map(|m| m.as_str()));
            continue;
        }
        let Some(caps) = RECORD_RE.captures(line) else {
            return Err(InputError::Line {
                line: idx + 1,
                content: line.to_string(),
            });
        };
        let group = match caps.name("group") {
            Some(group) => normalize_group(Some(group.as_str())),
            None => section.clone(),
        };
        let label = caps
            .name("label")
            .map(|m| m.as_str().trim().to_string())
            .filter(|label| !label.is_empty());
        records.push(TaskRecord {
            id: caps["id"].to_string(),
            label,
            group,
        });
    }
    Ok(records)
}

fn normalize_group(group: Option<&str>) -> Option<String> {
    group
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn check_duplicates(records: &[TaskRecord]) -> Result<(), InputError> {
    let mut seen: HashSet<(Option<&str>, &str)> = HashSet::new();
    for record in records {
        if !seen.insert((record.group.as_deref(), record.id.as_str())) {
            return Err(InputError::DuplicateId {
                id: record.id.clone(),
                group: record.group.clone().unwrap_or_default(),
            });
        }
    }
    Ok(())
}
