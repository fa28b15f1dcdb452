use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Computed urgency of a task relative to the current date.
///
/// Variant order is the sort order: `Overdue` is the most urgent and
/// compares least, so an ascending sort puts the most pressing work first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tier {
    Overdue,
    Today,
    Urgent,
    Warning,
    Normal,
}

/// Classify a due date against the current date.
///
/// Both arguments are calendar dates, so the day difference is exact and
/// free of partial-day drift; time-of-day never enters the comparison.
pub fn classify(due_date: NaiveDate, today: NaiveDate) -> Tier {
    let days_until_due = (due_date - today).num_days();

    if days_until_due < 0 {
        Tier::Overdue
    } else if days_until_due == 0 {
        Tier::Today
    } else if days_until_due <= 2 {
        Tier::Urgent
    } else if days_until_due <= 7 {
        Tier::Warning
    } else {
        Tier::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn tier_boundaries() {
        let now = today();
        assert_eq!(classify(now - Duration::days(1), now), Tier::Overdue);
        assert_eq!(classify(now, now), Tier::Today);
        assert_eq!(classify(now + Duration::days(1), now), Tier::Urgent);
        assert_eq!(classify(now + Duration::days(2), now), Tier::Urgent);
        assert_eq!(classify(now + Duration::days(3), now), Tier::Warning);
        assert_eq!(classify(now + Duration::days(7), now), Tier::Warning);
        assert_eq!(classify(now + Duration::days(8), now), Tier::Normal);
    }

    #[test]
    fn tier_order_puts_overdue_first() {
        assert!(Tier::Overdue < Tier::Today);
        assert!(Tier::Today < Tier::Urgent);
        assert!(Tier::Urgent < Tier::Warning);
        assert!(Tier::Warning < Tier::Normal);
    }

    #[test]
    fn classification_is_monotonic_in_due_date() {
        let now = today();
        let mut previous = classify(now - Duration::days(30), now);
        for offset in -29..30 {
            let tier = classify(now + Duration::days(offset), now);
            assert!(previous <= tier, "tier regressed at offset {offset}");
            previous = tier;
        }
    }
}
