//! Hour-of-day and day-of-week extraction from fix timestamps.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Derive parallel `hour` (0-23) and `dayofweek` (0=Monday..6=Sunday)
/// sequences from a sequence of timestamps.
///
/// A missing timestamp yields `None` at that position in both outputs.
/// This never fails: fixes without a usable time must stay inert
/// downstream, not abort the run.
pub fn extract_time_features(
    timestamps: &[Option<DateTime<Utc>>],
) -> (Vec<Option<u32>>, Vec<Option<u32>>) {
    let hours = timestamps.iter().map(|t| t.map(|t| t.hour())).collect();
    let days = timestamps
        .iter()
        .map(|t| t.map(|t| t.weekday().num_days_from_monday()))
        .collect();
    (hours, days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn extracts_hour_and_monday_based_weekday() {
        // 2024-07-01 is a Monday, 2024-07-06 a Saturday
        let stamps = vec![
            Some(Utc.with_ymd_and_hms(2024, 7, 1, 23, 30, 0).unwrap()),
            Some(Utc.with_ymd_and_hms(2024, 7, 6, 8, 15, 0).unwrap()),
            None,
        ];

        let (hours, days) = extract_time_features(&stamps);

        assert_eq!(hours, vec![Some(23), Some(8), None]);
        assert_eq!(days, vec![Some(0), Some(5), None]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let (hours, days) = extract_time_features(&[]);
        assert!(hours.is_empty());
        assert!(days.is_empty());
    }
}
