use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use booking_classifiers::Pipeline;

use crate::commands::input::RecordInput;

/// Write the aligned (and, unless disabled, scaled) feature vectors as CSV,
/// one row per record, with the canonical feature list as header. Every
/// record is transformed before anything is written, so a failing record
/// leaves `out` untouched.
pub fn write_feature_csv<W: Write>(pipeline: &Pipeline, input: &RecordInput, out: W) -> Result<()> {
    let vectors = pipeline
        .transform_batch(&input.records)
        .into_iter()
        .enumerate()
        .map(|(idx, result)| result.with_context(|| format!("Failed to transform record {}", idx)))
        .collect::<Result<Vec<_>>>()?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(pipeline.store().layout().names())?;
    for vector in &vectors {
        writer.write_record(vector.values().iter().map(|v| v.to_string()))?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_features<P: AsRef<Path>>(pipeline: &Pipeline, input: &RecordInput, output: Option<P>) -> Result<()> {
    match output {
        Some(path) => {
            let mut buffer = Vec::new();
            write_feature_csv(pipeline, input, &mut buffer)?;
            std::fs::write(&path, buffer)
                .with_context(|| format!("Failed to write output: {}", path.as_ref().display()))
        }
        None => write_feature_csv(pipeline, input, std::io::stdout().lock()),
    }
}
