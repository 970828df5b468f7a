use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use booking_classifiers::RawRecord;

/// Booking records read from an input file, remembering whether the file
/// held a single object or an array of them.
#[derive(Debug, Clone)]
pub struct RecordInput {
    pub records: Vec<RawRecord>,
    pub single: bool,
}

/// Read one JSON object, or a JSON array of objects, of booking records.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<RecordInput> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read input: {}", path.as_ref().display()))?;
    parse_records(&content)
        .with_context(|| format!("Failed to parse input: {}", path.as_ref().display()))
}

pub fn parse_records(content: &str) -> Result<RecordInput> {
    let value: Value = serde_json::from_str(content).context("Input is not valid JSON")?;
    match value {
        Value::Object(_) => Ok(RecordInput {
            records: vec![RawRecord::from_value(value)?],
            single: true,
        }),
        Value::Array(items) => {
            let records = items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| {
                    RawRecord::from_value(item).with_context(|| format!("Invalid record at index {}", idx))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(RecordInput {
                records,
                single: false,
            })
        }
        other => bail!("Expected a JSON object or array of objects, got {}", other),
    }
}
