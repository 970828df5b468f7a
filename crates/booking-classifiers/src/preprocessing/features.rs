//! Derived booking features.
//!
//! Every derivation is a pure function of fields that the defaulting stage
//! already guaranteed to be present. A field that is still absent, or holds a
//! string, is reported as malformed input.
use crate::error::PipelineError;
use crate::record::{FieldValue, RawRecord};

/// Days up to and including this one count as the start of the month.
pub const MONTH_START_LAST_DAY: f64 = 10.0;
/// Days from this one onwards count as the end of the month.
pub const MONTH_END_FIRST_DAY: f64 = 25.0;

/// `(is_month_start, is_month_end)` for a day of month.
pub fn month_position(day_of_month: f64) -> (i64, i64) {
    let start = (day_of_month <= MONTH_START_LAST_DAY) as i64;
    let end = (day_of_month >= MONTH_END_FIRST_DAY) as i64;
    (start, end)
}

pub fn total_stay(weekend_nights: f64, week_nights: f64) -> f64 {
    weekend_nights + week_nights
}

pub fn total_guests(adults: f64, children: f64, babies: f64) -> f64 {
    adults + children + babies
}

/// Average daily rate, never negative.
pub fn clip_adr(adr: f64) -> f64 {
    adr.max(0.0)
}

fn numeric(record: &RawRecord, field: &str) -> Result<f64, PipelineError> {
    match record.get(field) {
        Some(value) => value.as_number().ok_or_else(|| {
            PipelineError::malformed(field, format!("expected a number, got {:?}", value))
        }),
        None => Err(PipelineError::malformed(field, "required field is missing")),
    }
}

/// Add the derived columns and consume `arrival_date_day_of_month`.
pub fn engineer_features(mut record: RawRecord) -> Result<RawRecord, PipelineError> {
    let day = numeric(&record, "arrival_date_day_of_month")?;
    let (is_start, is_end) = month_position(day);
    record.insert("is_month_start", is_start);
    record.insert("is_month_end", is_end);
    record.remove("arrival_date_day_of_month");

    let stay = total_stay(
        numeric(&record, "stays_in_weekend_nights")?,
        numeric(&record, "stays_in_week_nights")?,
    );
    record.insert("total_stay", stay);

    let guests = total_guests(
        numeric(&record, "adults")?,
        numeric(&record, "children")?,
        numeric(&record, "babies")?,
    );
    record.insert("total_guests", guests);

    let adr = clip_adr(numeric(&record, "adr")?);
    record.insert("adr", FieldValue::Float(adr));

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RawRecord {
        RawRecord::new()
            .with("arrival_date_day_of_month", 15)
            .with("stays_in_weekend_nights", 2)
            .with("stays_in_week_nights", 3)
            .with("adults", 2)
            .with("children", 0)
            .with("babies", 1)
            .with("adr", 75.0)
    }

    #[test]
    fn month_boundaries() {
        assert_eq!(month_position(10.0), (1, 0));
        assert_eq!(month_position(25.0), (0, 1));
        assert_eq!(month_position(15.0), (0, 0));
        assert_eq!(month_position(1.0), (1, 0));
        assert_eq!(month_position(31.0), (0, 1));
    }

    #[test]
    fn adr_is_clipped_at_zero() {
        assert_eq!(clip_adr(-50.0), 0.0);
        assert_eq!(clip_adr(75.0), 75.0);
    }

    #[test]
    fn derived_columns_are_added_and_day_is_consumed() {
        let out = engineer_features(base()).unwrap();
        assert!(out.is_missing("arrival_date_day_of_month"));
        assert_eq!(out.get("total_stay").and_then(|v| v.as_number()), Some(5.0));
        assert_eq!(out.get("total_guests").and_then(|v| v.as_number()), Some(3.0));
        assert_eq!(out.get("is_month_start").and_then(|v| v.as_number()), Some(0.0));
        assert_eq!(out.get("is_month_end").and_then(|v| v.as_number()), Some(0.0));
        assert_eq!(out.get("adr").and_then(|v| v.as_number()), Some(75.0));
    }

    #[test]
    fn string_in_arithmetic_field_is_malformed() {
        let err = engineer_features(base().with("adults", "two")).unwrap_err();
        match err {
            PipelineError::MalformedInput { field, .. } => assert_eq!(field, "adults"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_arithmetic_field_is_malformed() {
        let mut record = base();
        record.remove("babies");
        assert!(matches!(
            engineer_features(record),
            Err(PipelineError::MalformedInput { .. })
        ));
    }
}
