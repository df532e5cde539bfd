//! A zone with one spring-forward change, for DST tests.

use chrono::{Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Eastern time around 2026-03-08: clocks jump from 02:00 EST to 03:00 EDT.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpringForward;

impl SpringForward {
    /// 02:00 EST as UTC.
    fn switch_utc() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 8)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap()
    }

    pub(crate) fn est() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    pub(crate) fn edt() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }
}

impl TimeZone for SpringForward {
    type Offset = FixedOffset;

    fn from_offset(_: &FixedOffset) -> Self {
        SpringForward
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        let gap_start = Self::switch_utc() - Duration::hours(5);
        if *local < gap_start {
            LocalResult::Single(Self::est())
        } else if *local < gap_start + Duration::hours(1) {
            LocalResult::None
        } else {
            LocalResult::Single(Self::edt())
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        if *utc < Self::switch_utc() {
            Self::est()
        } else {
            Self::edt()
        }
    }
}
