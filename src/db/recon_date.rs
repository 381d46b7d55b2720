//! Recon-date codec
//!
//! The backing store persists reconciliation dates as signed day offsets
//! from a fixed anchor day, the day before 2000-01-01. Offset 0 encodes the
//! anchor itself; a missing date is carried by the storage layer's NULL
//! indicator, never by the integer value, so 0 and "no value" stay distinct.

use chrono::{Duration, NaiveDate};

/// Anchor day of the integer encoding
pub fn anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1999, 12, 31).expect("anchor date is valid")
}

/// Encode a date as its signed day offset from the anchor
pub fn encode(date: NaiveDate) -> i32 {
    (date - anchor_date()).num_days() as i32
}

/// Decode a day offset back to a calendar date
pub fn decode(day_num: i32) -> NaiveDate {
    anchor_date() + Duration::days(i64::from(day_num))
}

/// Decode a nullable column value; SQL NULL maps to `None`, not the anchor
pub fn decode_nullable(day_num: Option<i32>) -> Option<NaiveDate> {
    day_num.map(decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_anchor_encodes_to_zero() {
        assert_eq!(encode(anchor_date()), 0);
        assert_eq!(decode(0), date(1999, 12, 31));
    }

    #[test]
    fn test_round_trip() {
        for d in [
            date(1970, 1, 1),
            date(1999, 12, 30),
            date(2000, 1, 1),
            date(2018, 4, 10),
            date(2038, 12, 31),
        ] {
            assert_eq!(decode(encode(d)), d);
        }
    }

    #[test]
    fn test_offsets_before_anchor_are_negative() {
        assert_eq!(encode(date(1999, 12, 30)), -1);
        assert_eq!(encode(date(2000, 1, 1)), 1);
    }

    #[test]
    fn test_null_decodes_to_absent_not_anchor() {
        assert_eq!(decode_nullable(None), None);
        assert_eq!(decode_nullable(Some(0)), Some(date(1999, 12, 31)));
    }
}
