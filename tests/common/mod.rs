#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use pillbox::db::Database;
use pillbox::models::event::{EventStatus, ReminderEvent};
use pillbox::models::medicine::Medicine;
use pillbox::models::reminder::{Recurrence, Reminder};
use tempfile::TempDir;

/// Create a temporary database for testing.
pub fn setup_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).unwrap();
    (dir, db)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn seed_medicine(db: &Database, user: &str, name: &str) -> Medicine {
    let med = Medicine::new(user, name);
    db.insert_medicine(&med).unwrap();
    med
}

/// Insert a daily reminder directly, bypassing engine validation.
pub fn seed_reminder(
    db: &Database,
    user: &str,
    medicine_id: &str,
    at: NaiveTime,
    start: NaiveDate,
) -> Reminder {
    let r = Reminder::new(user, medicine_id, at, Recurrence::Daily, start);
    db.insert_reminder(&r).unwrap();
    r
}

/// Append an outcome event for the reminder's occurrence on `day`.
pub fn record_event(
    db: &Database,
    reminder: &Reminder,
    day: NaiveDate,
    status: EventStatus,
) -> ReminderEvent {
    let mut ev = ReminderEvent::new(&reminder.id, reminder.scheduled_at(day), status);
    if status == EventStatus::Taken {
        ev.action_at = Some(reminder.scheduled_at(day));
    }
    db.insert_event(&ev).unwrap();
    ev
}
