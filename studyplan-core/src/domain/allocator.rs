use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::models::DayPlan;

/// Daily study time is never planned below this, no matter how far off the
/// deadline is.
const MIN_DAILY_HOURS: f64 = 0.5;
/// Weekday ceiling; weekends get 1.5x this via [`WEEKEND_FACTOR`].
const MAX_DAILY_HOURS: f64 = 3.0;
/// Weekends are assumed to have extra availability.
const WEEKEND_FACTOR: f64 = 1.5;

/// Spread `total_hours` of study over the days remaining before `due_date`.
///
/// The plan starts at `today`. A due date today or in the past is clamped to
/// a one-day plan rather than producing an empty one. The per-day target is
/// `total_hours / days`, clamped to [0.5, 3.0] so short deadlines front-load
/// effort without demanding unrealistic single-day loads, and weekend days
/// may take on 1.5x the target. Hours are rounded to the nearest quarter
/// hour, and the remaining-hours bookkeeping uses the rounded value, so
/// rounding drift never accumulates beyond a quarter hour.
///
/// When the total is exhausted before the deadline, trailing days are simply
/// not emitted; when capacity runs out first, the plan under-allocates and
/// never exceeds the per-day cap.
pub fn allocate(due_date: NaiveDate, total_hours: f64, today: NaiveDate) -> Vec<DayPlan> {
    let days_until_due = (due_date - today).num_days().max(1);
    let optimal_daily_hours =
        (total_hours / days_until_due as f64).clamp(MIN_DAILY_HOURS, MAX_DAILY_HOURS);

    let mut plan = Vec::new();
    let mut remaining_hours = total_hours;

    for offset in 0..days_until_due {
        if remaining_hours <= 0.0 {
            break;
        }

        let date = today + Duration::days(offset);
        let is_weekend = is_weekend(date);
        let cap = if is_weekend {
            optimal_daily_hours * WEEKEND_FACTOR
        } else {
            optimal_daily_hours
        };

        let daily_hours = round_quarter(remaining_hours.min(cap));
        if daily_hours <= 0.0 {
            // Less than 7.5 minutes left; within the rounding tolerance.
            break;
        }

        plan.push(DayPlan {
            date,
            hours: daily_hours,
            is_weekend,
            completed: false,
        });
        remaining_hours -= daily_hours;
    }

    plan
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Round to the nearest quarter hour.
fn round_quarter(hours: f64) -> f64 {
    (hours * 4.0).round() / 4.0
}
