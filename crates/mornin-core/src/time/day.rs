//! Resolving clock times against a concrete "now".
//!
//! All functions take `now` explicitly; nothing here reads the system clock.
//! Clock times are resolved as wall times in `now`'s zone, so an arrival on
//! the far side of a DST change lands on the right instant.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone};

use super::clock::{time_to_minutes, ClockTime};

/// `time` on `date` in `zone`. An ambiguous wall time takes the earlier
/// instant; one skipped by a gap is read with the `before` offset.
fn wall_time<Tz: TimeZone>(
    zone: &Tz,
    date: NaiveDate,
    time: ClockTime,
    before: &Tz::Offset,
) -> DateTime<Tz> {
    let wall = date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(time_to_minutes(time)));
    match zone.from_local_datetime(&wall) {
        LocalResult::Single(at) | LocalResult::Ambiguous(at, _) => at,
        LocalResult::None => {
            let utc = wall - Duration::seconds(i64::from(before.fix().local_minus_utc()));
            zone.from_utc_datetime(&utc)
        }
    }
}

/// The instant at which `time` occurs on `now`'s calendar day.
pub fn today_at<Tz: TimeZone>(time: ClockTime, now: DateTime<Tz>) -> DateTime<Tz> {
    wall_time(&now.timezone(), now.date_naive(), time, now.offset())
}

/// True when `arrival` applied to today is at or before `now`, i.e. the only
/// way to reach that clock time in the future is tomorrow.
pub fn is_arrival_next_day<Tz: TimeZone>(arrival: ClockTime, now: DateTime<Tz>) -> bool {
    today_at(arrival, now.clone()) <= now
}

/// The next instant (strictly after `now`) at which the clock reads `arrival`.
pub fn arrival_instant<Tz: TimeZone>(arrival: ClockTime, now: DateTime<Tz>) -> DateTime<Tz> {
    let today = today_at(arrival, now.clone());
    if today > now {
        return today;
    }
    let tomorrow = now.date_naive() + Duration::days(1);
    wall_time(&now.timezone(), tomorrow, arrival, now.offset())
}
