use chrono::{Datelike, NaiveDate};

use crate::models::reminder::{Recurrence, Reminder};

/// Whether a reminder is due on a calendar date.
///
/// Pure and deterministic: validity window first, then the recurrence rule.
/// `Interval` behaves the same as `Daily` within the window; the rule carries
/// no interval-day arithmetic. The `active` flag is the caller's filter, not
/// this function's.
pub fn is_due_on(reminder: &Reminder, date: NaiveDate) -> bool {
    if date < reminder.start_date {
        return false;
    }
    if let Some(end) = reminder.end_date
        && date > end
    {
        return false;
    }

    match reminder.recurrence {
        Recurrence::Daily | Recurrence::Interval => true,
        Recurrence::SpecificDays => {
            let weekday = date.weekday().num_days_from_monday() as u8;
            reminder.specific_days.contains(&weekday)
        }
    }
}
