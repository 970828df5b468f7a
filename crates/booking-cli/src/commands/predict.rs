use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use booking_classifiers::response::ErrorResponse;
use booking_classifiers::Pipeline;

use crate::commands::input::RecordInput;

/// Score every record and render each outcome as a response or error object.
pub fn predict_records(pipeline: &Pipeline, input: &RecordInput) -> Result<Value> {
    let mut rendered = Vec::with_capacity(input.records.len());
    for (idx, result) in pipeline.predict_batch(&input.records).into_iter().enumerate() {
        let value = match result {
            Ok(response) => serde_json::to_value(response)?,
            Err(e) => {
                if e.is_client_error() {
                    log::warn!("Record {} rejected: {}", idx, e);
                } else {
                    log::error!("Record {} failed: {}", idx, e);
                }
                serde_json::to_value(ErrorResponse::from(&e))?
            }
        };
        rendered.push(value);
    }

    if input.single {
        Ok(rendered.pop().unwrap_or(Value::Null))
    } else {
        Ok(Value::Array(rendered))
    }
}

/// Write `value` as pretty JSON to `output`, or stdout when `None`.
pub fn write_json(value: &Value, output: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, text + "\n")
            .with_context(|| format!("Failed to write output: {}", path.display())),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", text)?;
            Ok(())
        }
    }
}

/// Count of error objects in a rendered prediction output.
pub fn count_failures(value: &Value) -> usize {
    let is_error = |v: &Value| v.get("error").is_some();
    match value {
        Value::Array(items) => items.iter().filter(|v| is_error(v)).count(),
        other => is_error(other) as usize,
    }
}
