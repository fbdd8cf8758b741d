use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Remaining time until a listing's pickup deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeft {
    Expired,
    Remaining { hours: i64, minutes: i64 },
}

/// Computes the countdown for a listing created at `created_at` with a
/// pickup window of `pickup_window_hours`. The clock is an explicit
/// argument: callers re-invoke this on a fixed interval and two calls with
/// the same `now` always agree.
pub fn time_remaining(
    created_at: DateTime<Utc>,
    pickup_window_hours: u32,
    now: DateTime<Utc>,
) -> TimeLeft {
    let expires_at = created_at + Duration::hours(i64::from(pickup_window_hours));
    let left = expires_at - now;

    if left <= Duration::zero() {
        return TimeLeft::Expired;
    }

    TimeLeft::Remaining {
        hours: left.num_hours(),
        minutes: left.num_minutes() % 60,
    }
}

impl TimeLeft {
    pub fn is_available(&self) -> bool {
        matches!(self, TimeLeft::Remaining { .. })
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLeft::Expired => write!(f, "Expired"),
            TimeLeft::Remaining { hours, minutes } => write!(f, "{hours}h {minutes}m left"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::{TimeLeft, time_remaining};

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, min, sec).unwrap()
    }

    #[test]
    fn expired_exactly_at_deadline() {
        let result = time_remaining(at(10, 0, 0), 2, at(12, 0, 0));
        assert_eq!(result, TimeLeft::Expired);
    }

    #[test]
    fn expired_after_deadline() {
        let result = time_remaining(at(10, 0, 0), 2, at(15, 30, 0));
        assert_eq!(result, TimeLeft::Expired);
        assert_eq!(result.to_string(), "Expired");
    }

    #[test]
    fn one_minute_before_deadline() {
        let result = time_remaining(at(10, 0, 0), 2, at(11, 59, 0));
        assert_eq!(
            result,
            TimeLeft::Remaining {
                hours: 0,
                minutes: 1
            }
        );
        assert_eq!(result.to_string(), "0h 1m left");
    }

    #[test]
    fn splits_hours_and_minutes() {
        let result = time_remaining(at(8, 0, 0), 30, at(9, 30, 0));
        assert_eq!(
            result,
            TimeLeft::Remaining {
                hours: 28,
                minutes: 30
            }
        );
        assert_eq!(result.to_string(), "28h 30m left");
    }

    #[test]
    fn partial_minutes_are_truncated() {
        let result = time_remaining(at(10, 0, 0), 1, at(10, 59, 15));
        assert_eq!(
            result,
            TimeLeft::Remaining {
                hours: 0,
                minutes: 0
            }
        );
    }

    #[test]
    fn same_clock_gives_same_answer() {
        let created = at(9, 0, 0);
        let now = at(10, 17, 42);
        let first = time_remaining(created, 5, now);
        let second = time_remaining(created, 5, now);
        assert_eq!(first, second);
    }
}
