use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::{info, warn};

use crate::core::error::{EngineError, EngineResult};
use crate::core::{recurrence, status};
use crate::db::{Database, EventWithContext, ReminderQuery};
use crate::models::event::{DisplayStatus, EventStatus, ReminderEvent};
use crate::models::reminder::{Recurrence, Reminder};

// ---------------------------------------------------------------------------
// Parameter structs
// ---------------------------------------------------------------------------

/// Parameters for creating a new reminder.
pub struct NewReminderParams<'a> {
    pub medicine_id: &'a str,
    pub prescription_id: Option<&'a str>,
    pub reminder_time: NaiveTime,
    pub recurrence: Recurrence,
    pub specific_days: Vec<u8>,
    pub dosage_amount: Option<&'a str>,
    pub dosage_unit: Option<&'a str>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<&'a str>,
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct ReminderPatch {
    pub reminder_time: Option<NaiveTime>,
    pub recurrence: Option<Recurrence>,
    pub specific_days: Option<Vec<u8>>,
    pub dosage_amount: Option<String>,
    pub dosage_unit: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub active: Option<bool>,
    pub notes: Option<String>,
}

/// One row of the today dashboard.
#[derive(Debug, Serialize)]
pub struct TodayEntry {
    pub reminder: Reminder,
    pub medicine_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    pub scheduled_at: NaiveDateTime,
    pub status: DisplayStatus,
    pub is_pending: bool,
}

// ---------------------------------------------------------------------------
// Reminder CRUD
// ---------------------------------------------------------------------------

pub fn create_reminder(
    db: &Database,
    user_id: &str,
    params: NewReminderParams<'_>,
) -> EngineResult<Reminder> {
    // The medicine must exist and belong to the same user
    if db.get_medicine(params.medicine_id, user_id)?.is_none() {
        return Err(EngineError::not_found("medicine", params.medicine_id));
    }

    let mut reminder = Reminder::new(
        user_id,
        params.medicine_id,
        params.reminder_time,
        params.recurrence,
        params.start_date,
    );
    reminder.prescription_id = params.prescription_id.map(String::from);
    reminder.specific_days = params.specific_days;
    reminder.dosage_amount = params.dosage_amount.map(String::from);
    reminder.dosage_unit = params.dosage_unit.map(String::from);
    reminder.end_date = params.end_date;
    reminder.notes = params.notes.map(String::from);

    validate(&reminder)?;
    db.insert_reminder(&reminder)?;
    info!(reminder_id = %reminder.id, user_id, "reminder created");

    Ok(reminder)
}

pub fn get_reminder(db: &Database, reminder_id: &str, user_id: &str) -> EngineResult<Reminder> {
    db.get_reminder(reminder_id, user_id)?
        .ok_or_else(|| EngineError::not_found("reminder", reminder_id))
}

pub fn list_reminders(
    db: &Database,
    user_id: &str,
    query: &ReminderQuery,
) -> EngineResult<(Vec<Reminder>, u32)> {
    Ok(db.list_reminders(user_id, query)?)
}

pub fn update_reminder(
    db: &Database,
    reminder_id: &str,
    user_id: &str,
    patch: ReminderPatch,
) -> EngineResult<Reminder> {
    let mut reminder = get_reminder(db, reminder_id, user_id)?;

    if let Some(t) = patch.reminder_time {
        reminder.reminder_time = t;
    }
    if let Some(r) = patch.recurrence {
        reminder.recurrence = r;
    }
    if let Some(days) = patch.specific_days {
        reminder.specific_days = days;
    }
    if let Some(a) = patch.dosage_amount {
        reminder.dosage_amount = Some(a);
    }
    if let Some(u) = patch.dosage_unit {
        reminder.dosage_unit = Some(u);
    }
    if let Some(d) = patch.start_date {
        reminder.start_date = d;
    }
    if let Some(d) = patch.end_date {
        reminder.end_date = Some(d);
    }
    if let Some(a) = patch.active {
        reminder.active = a;
    }
    if let Some(n) = patch.notes {
        reminder.notes = Some(n);
    }
    reminder.updated_at = chrono::Local::now().naive_local();

    // A patch must not produce an invalid record
    validate(&reminder)?;

    if !db.update_reminder(&reminder)? {
        return Err(EngineError::not_found("reminder", reminder_id));
    }
    info!(reminder_id, user_id, "reminder updated");

    Ok(reminder)
}

/// Delete a reminder and, with it, every event it owns.
pub fn delete_reminder(db: &Database, reminder_id: &str, user_id: &str) -> EngineResult<()> {
    if !db.delete_reminder(reminder_id, user_id)? {
        return Err(EngineError::not_found("reminder", reminder_id));
    }
    info!(reminder_id, user_id, "reminder deleted");
    Ok(())
}

fn validate(reminder: &Reminder) -> EngineResult<()> {
    if reminder.recurrence == Recurrence::SpecificDays {
        if reminder.specific_days.is_empty() {
            return Err(EngineError::Validation(
                "specific_days recurrence requires at least one weekday".into(),
            ));
        }
        if let Some(bad) = reminder.specific_days.iter().find(|d| **d > 6) {
            return Err(EngineError::Validation(format!(
                "weekday index {bad} out of range (0 = Monday .. 6 = Sunday)"
            )));
        }
    }
    if let Some(end) = reminder.end_date
        && end < reminder.start_date
    {
        return Err(EngineError::Validation(format!(
            "end_date {end} is before start_date {}",
            reminder.start_date
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Today set
// ---------------------------------------------------------------------------

/// Active reminders due today: validity window covers the date and the
/// recurrence rule matches.
pub fn today_reminders(
    db: &Database,
    user_id: &str,
    today: NaiveDate,
) -> EngineResult<Vec<Reminder>> {
    let reminders = db.reminders_in_window(user_id, today)?;
    Ok(reminders
        .into_iter()
        .filter(|r| recurrence::is_due_on(r, today))
        .collect())
}

/// Dashboard view of today's reminders with derived status, ordered by time.
/// Entries already resolved by a take or a skip are filtered out.
pub fn today_with_status(
    db: &Database,
    user_id: &str,
    now: NaiveDateTime,
) -> EngineResult<Vec<TodayEntry>> {
    let today = now.date();
    let mut entries = Vec::new();

    for reminder in today_reminders(db, user_id, today)? {
        let latest = db.latest_event_for_day(&reminder.id, today)?;
        if matches!(
            latest.as_ref().map(|ev| ev.status),
            Some(EventStatus::Taken) | Some(EventStatus::Skipped)
        ) {
            continue;
        }

        let display = status::resolve_with_event(&reminder, today, now, latest.as_ref());
        let is_pending = status::is_pending(&reminder, today, now, latest.as_ref());

        let medicine_name = db
            .get_medicine(&reminder.medicine_id, user_id)?
            .map(|m| m.name)
            .unwrap_or_else(|| "unknown".to_string());

        entries.push(TodayEntry {
            scheduled_at: reminder.scheduled_at(today),
            medicine_name,
            dosage: reminder.dosage(),
            status: display,
            is_pending,
            reminder,
        });
    }

    entries.sort_by_key(|e| e.scheduled_at);
    Ok(entries)
}

/// Display status of one reminder on one day.
pub fn reminder_status(
    db: &Database,
    reminder_id: &str,
    user_id: &str,
    date: NaiveDate,
    now: NaiveDateTime,
) -> EngineResult<DisplayStatus> {
    let reminder = get_reminder(db, reminder_id, user_id)?;
    Ok(status::resolve(db, &reminder, date, now)?)
}

// ---------------------------------------------------------------------------
// Outcome recording
// ---------------------------------------------------------------------------

pub fn mark_taken(
    db: &Database,
    reminder_id: &str,
    user_id: &str,
    notes: Option<&str>,
    now: NaiveDateTime,
) -> EngineResult<ReminderEvent> {
    let reminder = get_reminder(db, reminder_id, user_id)?;

    let mut event = ReminderEvent::new(
        &reminder.id,
        reminder.scheduled_at(now.date()),
        EventStatus::Taken,
    );
    event.action_at = Some(now);
    event.notes = notes.map(String::from);

    db.insert_event(&event)?;
    info!(reminder_id, user_id, "reminder marked taken");
    Ok(event)
}

pub fn mark_skipped(
    db: &Database,
    reminder_id: &str,
    user_id: &str,
    notes: Option<&str>,
    now: NaiveDateTime,
) -> EngineResult<ReminderEvent> {
    let reminder = get_reminder(db, reminder_id, user_id)?;

    let mut event = ReminderEvent::new(
        &reminder.id,
        reminder.scheduled_at(now.date()),
        EventStatus::Skipped,
    );
    event.notes = notes.map(String::from);

    db.insert_event(&event)?;
    info!(reminder_id, user_id, "reminder marked skipped");
    Ok(event)
}

/// Record a "missed" event for every reminder due today whose scheduled time
/// has passed and which has no event for the day yet. Returns how many rows
/// were recorded. Re-running on the same day adds nothing: the existing-event
/// check is the idempotency guard (there is no unique constraint backing it,
/// so two concurrent sweeps can race).
pub fn sweep_missed(db: &Database, user_id: &str, now: NaiveDateTime) -> EngineResult<u32> {
    let today = now.date();
    let mut recorded = 0u32;

    for reminder in today_reminders(db, user_id, today)? {
        let scheduled = reminder.scheduled_at(today);
        if now < scheduled {
            continue;
        }
        if db.latest_event_for_day(&reminder.id, today)?.is_some() {
            continue;
        }

        let event = ReminderEvent::new(&reminder.id, scheduled, EventStatus::Missed);
        db.insert_event(&event)?;
        recorded += 1;
    }

    if recorded > 0 {
        warn!(user_id, recorded, "missed reminders recorded");
    }
    Ok(recorded)
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Paginated event history, newest first, with medicine context.
#[allow(clippy::too_many_arguments)]
pub fn reminder_history(
    db: &Database,
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    status: Option<EventStatus>,
    medicine_id: Option<&str>,
    page: u32,
    per_page: u32,
) -> EngineResult<(Vec<EventWithContext>, u32)> {
    Ok(db.events_in_range_paged(user_id, start, end, status, medicine_id, page, per_page)?)
}
