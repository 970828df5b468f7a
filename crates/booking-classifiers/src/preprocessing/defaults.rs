//! Training-time defaults for optional booking fields.
use crate::record::{FieldValue, RawRecord};

/// Categorical fields with a fixed fallback value.
pub const CATEGORY_DEFAULTS: [(&str, &str); 5] = [
    ("country", "PRT"),
    ("market_segment", "Online TA"),
    ("distribution_channel", "TA/TO"),
    ("meal", "BB"),
    ("city", "Unknown"),
];

/// Numeric fields with a fixed fallback value.
pub const NUMERIC_DEFAULTS: [(&str, i64); 4] = [
    ("children", 0),
    ("agent", 0),
    ("days_in_waiting_list", 0),
    ("arrival_date_day_of_month", 15),
];

/// Fill every missing optional field. Never fails: values of the wrong type
/// are left in place for the consuming stage to reject.
pub fn apply_defaults(mut record: RawRecord) -> RawRecord {
    for (field, default) in NUMERIC_DEFAULTS {
        if record.is_missing(field) {
            record.insert(field, default);
        }
    }
    for (field, default) in CATEGORY_DEFAULTS {
        if record.is_missing(field) {
            record.insert(field, default);
        }
    }

    // children was cast to an integer column during training
    if let Some(FieldValue::Float(v)) = record.get("children") {
        let truncated = v.trunc() as i64;
        record.insert("children", truncated);
    }

    record
}
