use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};

use crate::db::Database;
use crate::models::event::{DisplayStatus, EventStatus, ReminderEvent};
use crate::models::reminder::Reminder;

/// Derive the display status for a reminder on a calendar day.
///
/// Read-only: the missed-backlog sweep is what persists "missed" rows, this
/// only reports. The latest event for the day is authoritative when present.
pub fn resolve(
    db: &Database,
    reminder: &Reminder,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Result<DisplayStatus> {
    let latest = db.latest_event_for_day(&reminder.id, date)?;
    Ok(resolve_with_event(reminder, date, now, latest.as_ref()))
}

/// Pure resolution over an already-fetched latest event.
///
/// A "skipped" event is displayed as "upcoming" until its scheduled time has
/// passed; the skip only becomes visible after the deadline. Surprising but
/// load-bearing for existing consumers; do not normalise without product
/// sign-off.
pub fn resolve_with_event(
    reminder: &Reminder,
    date: NaiveDate,
    now: NaiveDateTime,
    latest: Option<&ReminderEvent>,
) -> DisplayStatus {
    let scheduled = reminder.scheduled_at(date);

    if let Some(ev) = latest {
        return match ev.status {
            EventStatus::Taken => DisplayStatus::Taken,
            EventStatus::Missed => DisplayStatus::Missed,
            EventStatus::Skipped => {
                if now < scheduled {
                    DisplayStatus::Upcoming
                } else {
                    DisplayStatus::Skipped
                }
            }
        };
    }

    if now >= scheduled {
        // Provisional: becomes a persisted row only via the sweep
        DisplayStatus::Missed
    } else {
        DisplayStatus::Upcoming
    }
}

/// The single pending-vs-upcoming boundary both the today view and the
/// status query use: due now, and not yet resolved by a take or a skip.
/// A missed row does not clear the pending flag; a late take is still
/// possible.
pub fn is_pending(
    reminder: &Reminder,
    date: NaiveDate,
    now: NaiveDateTime,
    latest: Option<&ReminderEvent>,
) -> bool {
    let scheduled = reminder.scheduled_at(date);
    if now < scheduled {
        return false;
    }
    !matches!(
        latest.map(|ev| ev.status),
        Some(EventStatus::Taken) | Some(EventStatus::Skipped)
    )
}
