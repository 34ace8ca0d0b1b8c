use anyhow::Result;
use rusqlite::Connection;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS medicines (
            id         TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL,
            name       TEXT NOT NULL,
            notes      TEXT,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_medicines_user ON medicines(user_id, name);

        CREATE TABLE IF NOT EXISTS reminders (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL,
            medicine_id     TEXT NOT NULL REFERENCES medicines(id),
            prescription_id TEXT,
            reminder_time   TEXT NOT NULL,
            recurrence      TEXT NOT NULL,
            specific_days   TEXT,
            dosage_amount   TEXT,
            dosage_unit     TEXT,
            start_date      TEXT NOT NULL,
            end_date        TEXT,
            active          INTEGER NOT NULL DEFAULT 1,
            notes           TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_reminders_user ON reminders(user_id, active);
        CREATE INDEX IF NOT EXISTS idx_reminders_medicine ON reminders(medicine_id);

        CREATE TABLE IF NOT EXISTS reminder_events (
            id           TEXT PRIMARY KEY,
            reminder_id  TEXT NOT NULL REFERENCES reminders(id) ON DELETE CASCADE,
            scheduled_at TEXT NOT NULL,
            action_at    TEXT,
            status       TEXT NOT NULL,
            notes        TEXT,
            created_at   TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_events_reminder_sched ON reminder_events(reminder_id, scheduled_at);
        CREATE INDEX IF NOT EXISTS idx_events_sched ON reminder_events(scheduled_at);",
    )?;
    Ok(())
}
