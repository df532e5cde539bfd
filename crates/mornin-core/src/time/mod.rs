mod clock;
mod day;
#[cfg(test)]
pub(crate) mod test_zone;

pub use clock::{
    minutes_to_time, parse_minutes_lenient, time_to_minutes, ClockTime, TimeFormat,
    MAX_MINUTES, MINUTES_PER_DAY,
};
pub use day::{arrival_instant, is_arrival_next_day, today_at};
