//! Categorical encoding: stored label encoders plus one-hot expansion.
//!
//! Label encoders are fitted artifacts and are only replayed here. Values an
//! encoder has never seen are mapped to its first known class instead of
//! failing the request.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::config::OneHotDrop;
use crate::error::PipelineError;
use crate::record::{format_float, FieldValue, RawRecord};

/// Columns replaced by their label-encoder code.
pub const LABEL_ENCODED_COLUMNS: [&str; 6] = [
    "hotel",
    "meal",
    "deposit_type",
    "customer_type",
    "reserved_room_type",
    "assigned_room_type",
];

/// Columns expanded into `<column>_<value>` indicators.
pub const ONE_HOT_COLUMNS: [&str; 5] = [
    "country",
    "market_segment",
    "distribution_channel",
    "agent",
    "city",
];

/// Numeric columns of one encoded booking, keyed by column name.
pub type EncodedFrame = BTreeMap<String, f64>;

/// A fitted label encoder: the code of a class is its position in `classes`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            bail!("label encoder has no known classes");
        }
        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), code).is_some() {
                bail!("label encoder lists class '{}' more than once", class);
            }
        }
        Ok(Self { classes, codes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Class substituted for values the encoder has never seen.
    pub fn fallback_class(&self) -> &str {
        &self.classes[0]
    }

    pub fn is_known(&self, label: &str) -> bool {
        self.codes.contains_key(label)
    }

    /// Code for `label`, or the fallback class code when it is unknown.
    pub fn transform(&self, label: &str) -> usize {
        self.codes.get(label).copied().unwrap_or(0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EncoderEntry {
    Classes(Vec<FieldValue>),
    Fitted {
        #[serde(alias = "classes_")]
        classes: Vec<FieldValue>,
    },
}

/// One label encoder per encoded column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelEncoderSet {
    encoders: BTreeMap<String, LabelEncoder>,
}

impl LabelEncoderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: &str, encoder: LabelEncoder) {
        self.encoders.insert(column.to_string(), encoder);
    }

    /// Convenience constructor from plain class lists.
    pub fn from_classes<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (column, classes) in columns {
            let column = column.into();
            let encoder = LabelEncoder::new(classes)
                .with_context(|| format!("Invalid label encoder for column '{}'", column))?;
            set.encoders.insert(column, encoder);
        }
        Ok(set)
    }

    /// Parse `{"column": [classes...]}` or `{"column": {"classes": [...]}}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, EncoderEntry> =
            serde_json::from_str(json).context("Failed to parse label encoders")?;
        Self::from_classes(raw.into_iter().map(|(column, entry)| {
            let classes = match entry {
                EncoderEntry::Classes(c) | EncoderEntry::Fitted { classes: c } => c,
            };
            (column, classes.iter().map(FieldValue::category).collect())
        }))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read label encoders: {}", path.as_ref().display())
        })?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid label encoders: {}", path.as_ref().display()))
    }

    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.get(column)
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    /// Fail unless every label-encoded column has an encoder.
    pub fn ensure_complete(&self) -> Result<()> {
        let missing: Vec<&str> = LABEL_ENCODED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !self.encoders.contains_key(*c))
            .collect();
        if !missing.is_empty() {
            bail!("label encoders missing for columns: {}", missing.join(", "));
        }
        Ok(())
    }
}

/// Indicator column names produced by one-hot expanding `column` over the
/// distinct `observed` labels. Labels are sorted; with `DropFirst` the first
/// one is the reference level and gets no column.
pub fn indicator_columns(column: &str, observed: &[String], drop: OneHotDrop) -> Vec<String> {
    let distinct: BTreeSet<&str> = observed.iter().map(String::as_str).collect();
    let skip = match drop {
        OneHotDrop::DropFirst => 1,
        OneHotDrop::KeepAll => 0,
    };
    distinct
        .into_iter()
        .skip(skip)
        .map(|label| format!("{}_{}", column, label))
        .collect()
}

fn one_hot_label(column: &str, value: &FieldValue) -> Result<String, PipelineError> {
    if column != "agent" {
        return Ok(value.category());
    }
    // agent ids were cast to float before expansion, so "9" became "agent_9.0"
    let id = match value {
        FieldValue::Text(s) => s.trim().parse::<f64>().map_err(|_| {
            PipelineError::malformed(column, format!("expected a numeric agent id, got '{}'", s))
        })?,
        other => other.as_number().unwrap_or_default(),
    };
    Ok(format_float(id))
}

fn is_categorical(field: &str) -> bool {
    LABEL_ENCODED_COLUMNS.contains(&field) || ONE_HOT_COLUMNS.contains(&field)
}

/// Encode every categorical column of a defaulted, feature-engineered record
/// and carry the remaining numeric fields through unchanged.
pub fn encode_categoricals(
    record: &RawRecord,
    encoders: Option<&LabelEncoderSet>,
    drop: OneHotDrop,
) -> Result<EncodedFrame, PipelineError> {
    let encoders = encoders
        .ok_or_else(|| PipelineError::NotReady("label encoders are not loaded".to_string()))?;

    let mut frame = EncodedFrame::new();

    for column in LABEL_ENCODED_COLUMNS {
        let encoder = encoders.get(column).ok_or_else(|| {
            PipelineError::NotReady(format!("no label encoder for column '{}'", column))
        })?;
        let value = record
            .get(column)
            .ok_or_else(|| PipelineError::malformed(column, "required categorical field is missing"))?;
        let label = value.category();
        if !encoder.is_known(&label) {
            log::debug!(
                "Unseen {} value '{}', substituting '{}'",
                column,
                label,
                encoder.fallback_class()
            );
        }
        frame.insert(column.to_string(), encoder.transform(&label) as f64);
    }

    for column in ONE_HOT_COLUMNS {
        let Some(value) = record.get(column) else {
            continue;
        };
        let label = one_hot_label(column, value)?;
        for name in indicator_columns(column, &[label], drop) {
            frame.insert(name, 1.0);
        }
    }

    for (field, value) in record.iter() {
        if is_categorical(field) {
            continue;
        }
        match value.as_number() {
            Some(v) => {
                frame.insert(field.to_string(), v);
            }
            None => log::debug!("Dropping non-numeric field '{}'", field),
        }
    }

    Ok(frame)
}
