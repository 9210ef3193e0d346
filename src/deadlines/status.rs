use chrono::{DateTime, NaiveDate, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrgencyTier {
    VeryUrgent,
    Urgent,
    Warning,
    Safe,
}

impl UrgencyTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryUrgent => "very-urgent",
            Self::Urgent => "urgent",
            Self::Warning => "warning",
            Self::Safe => "safe",
        }
    }
}

/// Past deadlines have negative `days_left` and land in `VeryUrgent`.
pub fn status(days_left: i64) -> UrgencyTier {
    if days_left <= 3 {
        UrgencyTier::VeryUrgent
    } else if days_left <= 7 {
        UrgencyTier::Urgent
    } else if days_left <= 15 {
        UrgencyTier::Warning
    } else {
        UrgencyTier::Safe
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

/// Whole days from `now` until midnight UTC of `date`, rounded up.
pub fn days_left(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let deadline = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let diff = (deadline - now).num_milliseconds();
    ceil_div(diff, MILLIS_PER_DAY)
}

fn ceil_div(n: i64, d: i64) -> i64 {
    let q = n / d;
    if n % d > 0 {
        q + 1
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn tier_boundaries() {
        assert_eq!(status(3), UrgencyTier::VeryUrgent);
        assert_eq!(status(4), UrgencyTier::Urgent);
        assert_eq!(status(7), UrgencyTier::Urgent);
        assert_eq!(status(8), UrgencyTier::Warning);
        assert_eq!(status(15), UrgencyTier::Warning);
        assert_eq!(status(16), UrgencyTier::Safe);
        assert_eq!(status(0), UrgencyTier::VeryUrgent);
        assert_eq!(status(-5), UrgencyTier::VeryUrgent);
    }

    #[test]
    fn tier_names() {
        assert_eq!(UrgencyTier::VeryUrgent.as_str(), "very-urgent");
        assert_eq!(UrgencyTier::Safe.as_str(), "safe");
    }

    #[test]
    fn days_left_rounds_up_partial_days() {
        let date = parse_date("2025-03-10").unwrap();

        let now = Utc.with_ymd_and_hms(2025, 3, 9, 23, 0, 0).unwrap();
        assert_eq!(days_left(date, now), 1);

        let now = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();
        assert_eq!(days_left(date, now), 7);

        let now = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
        assert_eq!(days_left(date, now), 0);
    }

    #[test]
    fn days_left_is_negative_for_past_dates() {
        let date = parse_date("2025-03-10").unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 15, 6, 0, 0).unwrap();
        // -5.25 days rounds up to -5.
        assert_eq!(days_left(date, now), -5);
        assert_eq!(status(days_left(date, now)), UrgencyTier::VeryUrgent);
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("2025-02-30").is_none());
        assert!(parse_date("tomorrow").is_none());
        assert!(parse_date("").is_none());
        assert_eq!(
            parse_date("2099-01-01"),
            NaiveDate::from_ymd_opt(2099, 1, 1)
        );
    }
}
