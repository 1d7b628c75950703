//! Capture time extraction from embedded EXIF metadata.
//!
//! Reads `DateTimeOriginal` from any container `kamadak-exif` understands
//! (JPEG, TIFF, HEIF, PNG, WebP). EXIF stores local wall-clock time; when
//! `OffsetTimeOriginal` is present it is used to convert to UTC, otherwise
//! the value is taken as UTC. `SubSecTimeOriginal` adds fractional seconds.

use std::io::Cursor;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SubsecRound, TimeZone, Utc};
use exif::{In, Tag, Value};

/// Returns the capture time embedded in `data`, or `None` when the file has
/// no EXIF block, no `DateTimeOriginal`, or an unparsable value.
#[must_use]
pub fn capture_time(data: &[u8]) -> Option<DateTime<Utc>> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(data))
        .ok()?;

    let mut taken = exif::DateTime::from_ascii(ascii_field(&exif, Tag::DateTimeOriginal)?).ok()?;
    if let Some(subsec) = ascii_field(&exif, Tag::SubSecTimeOriginal) {
        // A malformed sub-second value only loses precision.
        let _ = taken.parse_subsec(subsec);
    }
    if let Some(offset) = ascii_field(&exif, Tag::OffsetTimeOriginal) {
        let _ = taken.parse_offset(offset);
    }
    to_utc(&taken)
}

/// Capture time of `data`, falling back to `now` when none is embedded.
///
/// The fallback is silent: a photo without metadata is not an error.
#[must_use]
pub fn taken_at_or(data: &[u8], now: DateTime<Utc>) -> DateTime<Utc> {
    match capture_time(data) {
        Some(taken) => taken,
        None => {
            tracing::debug!("no usable EXIF capture time, using ingestion time");
            now
        }
    }
}

/// Current time truncated to millisecond precision, the resolution used for
/// every timestamp the gateway writes.
#[must_use]
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn ascii_field(exif: &exif::Exif, tag: Tag) -> Option<&[u8]> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(values) => values.first().map(Vec::as_slice),
        _ => None,
    }
}

fn to_utc(dt: &exif::DateTime) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(
        i32::from(dt.year),
        u32::from(dt.month),
        u32::from(dt.day),
    )?;
    let time = NaiveTime::from_hms_nano_opt(
        u32::from(dt.hour),
        u32::from(dt.minute),
        u32::from(dt.second),
        dt.nanosecond.unwrap_or(0),
    )?;
    // EXIF offsets are minutes east of UTC.
    let offset = FixedOffset::east_opt(i32::from(dt.offset.unwrap_or(0)) * 60)?;
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|local| local.with_timezone(&Utc))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parsed(ascii: &[u8]) -> exif::DateTime {
        let Ok(dt) = exif::DateTime::from_ascii(ascii) else {
            panic!("valid exif datetime");
        };
        dt
    }

    #[test]
    fn naive_value_is_taken_as_utc() {
        let converted = to_utc(&parsed(b"2023:08:01 10:00:00")).map(|t| t.to_rfc3339());
        assert_eq!(converted.as_deref(), Some("2023-08-01T10:00:00+00:00"));
    }

    #[test]
    fn offset_shifts_to_utc() {
        let mut dt = parsed(b"2023:08:01 12:00:00");
        assert!(dt.parse_offset(b"+02:00").is_ok());
        let converted = to_utc(&dt).map(|t| t.to_rfc3339());
        assert_eq!(converted.as_deref(), Some("2023-08-01T10:00:00+00:00"));
    }

    #[test]
    fn impossible_calendar_date_is_rejected() {
        // Rejected either by the EXIF parser or by the calendar conversion.
        if let Ok(dt) = exif::DateTime::from_ascii(b"2023:02:30 10:00:00") {
            assert!(to_utc(&dt).is_none());
        }
    }

    #[test]
    fn non_image_bytes_have_no_capture_time() {
        assert!(capture_time(b"definitely not a photo").is_none());
        assert!(capture_time(&[]).is_none());
    }

    #[test]
    fn fallback_uses_supplied_now() {
        let now = now_millis();
        assert_eq!(taken_at_or(b"\xff\xd8\xff\xd9", now), now);
    }
}
