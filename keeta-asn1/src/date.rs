//! UTCTime and GeneralizedTime string forms.
//!
//! UTCTime is `YYMMDDhhmmssZ` with the two-digit year windowed onto
//! 1950-2049; GeneralizedTime is always emitted in the millisecond form
//! `YYYYMMDDhhmmss.mmmZ`, while whole-second input (`YYYYMMDDhhmmssZ`) is
//! still accepted when reading.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};

/// GeneralizedTime format, millisecond precision.
pub const GENERALIZED_TIME_FORMAT: &str = "%Y%m%d%H%M%S%.3fZ";
/// UTCTime format, second precision.
pub const UTC_TIME_FORMAT: &str = "%y%m%d%H%M%SZ";

/// UTCTime carries a two-digit year and can only represent 1950 through
/// 2049.
pub fn fits_utc_time(date: &DateTime<Utc>) -> bool {
    (1950..=2049).contains(&date.year())
}

/// True when the instant has no sub-second component once truncated to
/// millisecond precision.
pub fn is_whole_second(date: &DateTime<Utc>) -> bool {
    date.timestamp_millis() % 1000 == 0
}

/// Truncate toward negative infinity to whole milliseconds.
pub fn truncate_to_millis(date: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(date.timestamp_millis())
        .single()
        .unwrap_or(date)
}

/// Truncate toward negative infinity to whole seconds.
pub fn truncate_to_seconds(date: DateTime<Utc>) -> DateTime<Utc> {
    let millis = date.timestamp_millis();
    Utc.timestamp_millis_opt(millis - millis.rem_euclid(1000))
        .single()
        .unwrap_or(date)
}

/// Render the UTCTime content octets. The caller is responsible for the
/// [`fits_utc_time`] window; sub-second precision is dropped.
pub fn format_utc_time(date: &DateTime<Utc>) -> String {
    date.format(UTC_TIME_FORMAT).to_string()
}

/// Render the GeneralizedTime content octets, always in millisecond form.
pub fn format_generalized_time(date: &DateTime<Utc>) -> String {
    truncate_to_millis(*date)
        .format(GENERALIZED_TIME_FORMAT)
        .to_string()
}

/// Parse UTCTime content octets.
///
/// Parsed by hand because the ASN.1 year window pivots at 50 (50-99 are the
/// 1900s) while chrono's `%y` pivots at 69.
pub fn parse_utc_time(text: &str) -> Option<DateTime<Utc>> {
    let bytes = text.as_bytes();
    if bytes.len() != 13 || bytes[12] != b'Z' {
        return None;
    }
    if !bytes[..12].iter().all(u8::is_ascii_digit) {
        return None;
    }

    let merge = |index: usize| u32::from(bytes[index] - b'0') * 10 + u32::from(bytes[index + 1] - b'0');

    let yy = merge(0);
    let year = if yy >= 50 { 1900 + yy } else { 2000 + yy };
    Utc.with_ymd_and_hms(
        year as i32,
        merge(2),
        merge(4),
        merge(6),
        merge(8),
        merge(10),
    )
    .single()
}

/// Parse GeneralizedTime content octets, with or without the millisecond
/// fraction.
pub fn parse_generalized_time(text: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(text, GENERALIZED_TIME_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_time_epoch() {
        let epoch = Utc.timestamp_millis_opt(0).unwrap();
        assert_eq!(format_utc_time(&epoch), "700101000000Z");
        assert_eq!(parse_utc_time("700101000000Z"), Some(epoch));
    }

    #[test]
    fn utc_time_year_window() {
        assert_eq!(
            parse_utc_time("500101000000Z").unwrap().year(),
            1950,
            "50 belongs to the 1900s"
        );
        assert_eq!(parse_utc_time("491231235959Z").unwrap().year(), 2049);
        assert!(fits_utc_time(&Utc.with_ymd_and_hms(2049, 12, 31, 23, 59, 59).unwrap()));
        assert!(!fits_utc_time(&Utc.with_ymd_and_hms(2050, 1, 1, 0, 0, 0).unwrap()));
        assert!(!fits_utc_time(&Utc.with_ymd_and_hms(1949, 12, 31, 23, 59, 59).unwrap()));
    }

    #[test]
    fn utc_time_rejects_malformed() {
        assert_eq!(parse_utc_time("70010100000Z"), None);
        assert_eq!(parse_utc_time("7001010000005"), None);
        assert_eq!(parse_utc_time("70x101000000Z"), None);
        assert_eq!(parse_utc_time("701301000000Z"), None);
    }

    #[test]
    fn generalized_time_millisecond_form() {
        let date = Utc.timestamp_millis_opt(1655921880210).unwrap();
        assert_eq!(format_generalized_time(&date), "20220622181800.210Z");
        assert_eq!(parse_generalized_time("20220622181800.210Z"), Some(date));
    }

    #[test]
    fn generalized_time_accepts_whole_seconds() {
        let date = Utc.with_ymd_and_hms(2022, 9, 26, 10, 0, 0).unwrap();
        assert_eq!(parse_generalized_time("20220926100000Z"), Some(date));
        assert_eq!(format_generalized_time(&date), "20220926100000.000Z");
    }

    #[test]
    fn truncation_is_toward_negative_infinity() {
        let date = Utc.timestamp_millis_opt(-500).unwrap();
        assert_eq!(truncate_to_seconds(date).timestamp_millis(), -1000);
        assert!(!is_whole_second(&date));

        let date = Utc.timestamp_millis_opt(1500).unwrap();
        assert_eq!(truncate_to_seconds(date).timestamp_millis(), 1000);
        assert!(is_whole_second(&truncate_to_seconds(date)));
    }
}
