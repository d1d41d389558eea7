//! Fixed UTC+9 ("JST") time handling and Windows SYSTEMTIME/FILETIME conversions.
//!
//! EDCB always reports wall-clock times in JST regardless of the host's own
//! timezone, and never observes DST. There is no `chrono-tz`/IANA lookup
//! involved: the offset is a single constant.

use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// The fixed +09:00 offset EDCB reports all timestamps in.
pub fn jst() -> UtcOffset {
    UtcOffset::from_hms(9, 0, 0).expect("9:00:00 is a valid UTC offset")
}

/// The sentinel time used when a SYSTEMTIME fails to parse: the Unix epoch, in JST.
pub fn epoch_sentinel() -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH.to_offset(jst())
}

/// Decodes a 16-byte little-endian Windows SYSTEMTIME into a JST `OffsetDateTime`.
///
/// Day-of-week (bytes 4-5) is ignored. Milliseconds are ignored on read (the
/// protocol always writes zero there). On any range error (e.g. month 0, or
/// a day that doesn't exist in the given month) the epoch sentinel is
/// returned instead of propagating an error — SYSTEMTIME range violations
/// are not structural failures for this protocol.
pub fn systemtime_from_fields(
    year: u16,
    month: u16,
    day: u16,
    hour: u16,
    minute: u16,
    second: u16,
) -> OffsetDateTime {
    try_systemtime_from_fields(year, month, day, hour, minute, second)
        .unwrap_or_else(|| epoch_sentinel())
}

fn try_systemtime_from_fields(
    year: u16,
    month: u16,
    day: u16,
    hour: u16,
    minute: u16,
    second: u16,
) -> Option<OffsetDateTime> {
    let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
    let date = Date::from_calendar_date(i32::from(year), month, u8::try_from(day).ok()?).ok()?;
    let time = Time::from_hms(
        u8::try_from(hour).ok()?,
        u8::try_from(minute).ok()?,
        u8::try_from(second).ok()?,
    )
    .ok()?;
    Some(PrimitiveDateTime::new(date, time).assume_offset(jst()))
}

/// Splits a JST `OffsetDateTime` into the fields written to a SYSTEMTIME,
/// including the day-of-week as `ISO weekday mod 7` (Sunday = 0).
pub fn systemtime_to_fields(t: OffsetDateTime) -> (u16, u16, u16, u16, u16, u16, u16) {
    let t = t.to_offset(jst());
    let year = t.year() as u16;
    let month = u16::from(u8::from(t.month()));
    let day_of_week = u16::from(t.weekday().number_from_sunday() % 7);
    let day = u16::from(t.day());
    let hour = u16::from(t.hour());
    let minute = u16::from(t.minute());
    let second = u16::from(t.second());
    (year, month, day_of_week, day, hour, minute, second)
}

/// Windows FILETIME epoch (1601-01-01 UTC) expressed as 100ns ticks before the Unix epoch.
const FILETIME_UNIX_EPOCH_DELTA: i64 = 116_444_736_000_000_000;

/// The fixed +09:00 offset expressed in seconds, for callers building
/// `service_time_list` bounds who need it as a plain `i64`.
pub fn jst_offset_seconds() -> i64 {
    jst().whole_seconds() as i64
}

/// Converts a JST wall-clock time into a Windows FILETIME (100ns ticks since
/// 1601-01-01 UTC): `(unix_timestamp + tz_offset_seconds) * 10_000_000 +
/// 116_444_736_000_000_000` (§4.6). `tz_offset_seconds` is normally
/// [`jst_offset_seconds`] — it's a parameter rather than baked in because the
/// formula itself is timezone-agnostic and the spec states it in terms of an
/// explicit offset.
///
/// `service_time_list` entries passed to `EnumPgInfoEx`/`EnumPgArc` use this
/// encoding for their trailing begin/end range.
pub fn to_filetime(t: OffsetDateTime, tz_offset_seconds: i64) -> i64 {
    let unix_timestamp = t.unix_timestamp();
    (unix_timestamp + tz_offset_seconds) * 10_000_000 + FILETIME_UNIX_EPOCH_DELTA
}

/// Converts a Windows FILETIME back into a UTC `OffsetDateTime`, inverting
/// [`to_filetime`]'s `tz_offset_seconds` term.
pub fn from_filetime(filetime: i64, tz_offset_seconds: i64) -> OffsetDateTime {
    let unix_timestamp = (filetime - FILETIME_UNIX_EPOCH_DELTA).div_euclid(10_000_000) - tz_offset_seconds;
    OffsetDateTime::from_unix_timestamp(unix_timestamp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_sentinel_is_midnight_jst_1970() {
        let e = epoch_sentinel();
        assert_eq!(e.unix_timestamp(), 0);
        assert_eq!(e.offset(), jst());
    }

    #[test]
    fn invalid_month_falls_back_to_sentinel() {
        let t = systemtime_from_fields(2024, 0, 1, 0, 0, 0);
        assert_eq!(t, epoch_sentinel());
    }

    #[test]
    fn invalid_day_falls_back_to_sentinel() {
        // April has 30 days.
        let t = systemtime_from_fields(2024, 4, 31, 0, 0, 0);
        assert_eq!(t, epoch_sentinel());
    }

    #[test]
    fn fields_round_trip() {
        let date = Date::from_calendar_date(2024, Month::July, 26).unwrap();
        let time = Time::from_hms(21, 5, 30).unwrap();
        let t = PrimitiveDateTime::new(date, time).assume_offset(jst());
        let (year, month, _dow, day, hour, minute, second) = systemtime_to_fields(t);
        let back = systemtime_from_fields(year, month, day, hour, minute, second);
        assert_eq!(back, t);
    }

    #[test]
    fn filetime_round_trips_through_unix_seconds() {
        let t = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let ft = to_filetime(t, jst_offset_seconds());
        let back = from_filetime(ft, jst_offset_seconds());
        assert_eq!(back.unix_timestamp(), t.unix_timestamp());
    }

    #[test]
    fn filetime_epoch_matches_known_constant_at_zero_offset() {
        let t = OffsetDateTime::UNIX_EPOCH;
        assert_eq!(to_filetime(t, 0), FILETIME_UNIX_EPOCH_DELTA);
    }

    #[test]
    fn filetime_applies_the_tz_offset_before_scaling() {
        let t = OffsetDateTime::UNIX_EPOCH;
        let offset = jst_offset_seconds();
        assert_eq!(offset, 9 * 3600);
        assert_eq!(to_filetime(t, offset), FILETIME_UNIX_EPOCH_DELTA + offset * 10_000_000);
    }
}
