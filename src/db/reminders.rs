use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::params;

use crate::models::reminder::{Recurrence, Reminder};

use super::Database;

/// Listing filter. `page` is 1-based.
#[derive(Debug, Clone)]
pub struct ReminderQuery {
    pub active: Option<bool>,
    pub medicine_id: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for ReminderQuery {
    fn default() -> Self {
        Self {
            active: None,
            medicine_id: None,
            page: 1,
            per_page: 20,
        }
    }
}

struct ReminderRow {
    id: String,
    user_id: String,
    medicine_id: String,
    prescription_id: Option<String>,
    reminder_time: String,
    recurrence: String,
    specific_days: Option<String>,
    dosage_amount: Option<String>,
    dosage_unit: Option<String>,
    start_date: String,
    end_date: Option<String>,
    active: bool,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

fn row_to_reminder(r: ReminderRow) -> Result<Reminder> {
    let reminder_time: NaiveTime = r.reminder_time.parse()?;
    let recurrence: Recurrence = r.recurrence.parse()?;
    let specific_days: Vec<u8> = match r.specific_days {
        Some(ref s) => serde_json::from_str(s).unwrap_or_default(),
        None => Vec::new(),
    };
    let start_date: NaiveDate = r.start_date.parse()?;
    let end_date: Option<NaiveDate> = match r.end_date {
        Some(ref s) => Some(s.parse()?),
        None => None,
    };
    let created_at: NaiveDateTime = super::parse_stored_dt(&r.created_at)?;
    let updated_at: NaiveDateTime = super::parse_stored_dt(&r.updated_at)?;

    Ok(Reminder {
        id: r.id,
        user_id: r.user_id,
        medicine_id: r.medicine_id,
        prescription_id: r.prescription_id,
        reminder_time,
        recurrence,
        specific_days,
        dosage_amount: r.dosage_amount,
        dosage_unit: r.dosage_unit,
        start_date,
        end_date,
        active: r.active,
        notes: r.notes,
        created_at,
        updated_at,
    })
}

const SELECT_COLS: &str = "id, user_id, medicine_id, prescription_id, reminder_time, recurrence, specific_days, dosage_amount, dosage_unit, start_date, end_date, active, notes, created_at, updated_at";

macro_rules! map_row {
    ($row:expr) => {
        Ok(ReminderRow {
            id: $row.get(0)?,
            user_id: $row.get(1)?,
            medicine_id: $row.get(2)?,
            prescription_id: $row.get(3)?,
            reminder_time: $row.get(4)?,
            recurrence: $row.get(5)?,
            specific_days: $row.get(6)?,
            dosage_amount: $row.get(7)?,
            dosage_unit: $row.get(8)?,
            start_date: $row.get(9)?,
            end_date: $row.get(10)?,
            active: $row.get(11)?,
            notes: $row.get(12)?,
            created_at: $row.get(13)?,
            updated_at: $row.get(14)?,
        })
    };
}

fn specific_days_json(days: &[u8]) -> Result<Option<String>> {
    if days.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(days)?))
    }
}

impl Database {
    pub fn insert_reminder(&self, r: &Reminder) -> Result<()> {
        self.conn.execute(
            "INSERT INTO reminders (id, user_id, medicine_id, prescription_id, reminder_time, recurrence, specific_days, dosage_amount, dosage_unit, start_date, end_date, active, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                r.id,
                r.user_id,
                r.medicine_id,
                r.prescription_id,
                r.reminder_time.to_string(),
                r.recurrence.to_string(),
                specific_days_json(&r.specific_days)?,
                r.dosage_amount,
                r.dosage_unit,
                r.start_date.to_string(),
                r.end_date.map(|d| d.to_string()),
                r.active as i32,
                r.notes,
                r.created_at.to_string(),
                r.updated_at.to_string(),
            ],
        )?;
        Ok(())
    }

    pub fn get_reminder(&self, reminder_id: &str, user_id: &str) -> Result<Option<Reminder>> {
        let sql = format!("SELECT {SELECT_COLS} FROM reminders WHERE id = ?1 AND user_id = ?2");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![reminder_id, user_id], |row| map_row!(row))?;
        match rows.next() {
            Some(row) => Ok(Some(row_to_reminder(row?)?)),
            None => Ok(None),
        }
    }

    /// Full-row update. Returns false when the reminder does not exist or is
    /// not owned by the user.
    pub fn update_reminder(&self, r: &Reminder) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE reminders SET medicine_id = ?1, prescription_id = ?2, reminder_time = ?3, recurrence = ?4, specific_days = ?5, dosage_amount = ?6, dosage_unit = ?7, start_date = ?8, end_date = ?9, active = ?10, notes = ?11, updated_at = ?12
             WHERE id = ?13 AND user_id = ?14",
            params![
                r.medicine_id,
                r.prescription_id,
                r.reminder_time.to_string(),
                r.recurrence.to_string(),
                specific_days_json(&r.specific_days)?,
                r.dosage_amount,
                r.dosage_unit,
                r.start_date.to_string(),
                r.end_date.map(|d| d.to_string()),
                r.active as i32,
                r.notes,
                r.updated_at.to_string(),
                r.id,
                r.user_id,
            ],
        )?;
        Ok(count > 0)
    }

    /// Delete a reminder; its events go with it (FK cascade).
    pub fn delete_reminder(&self, reminder_id: &str, user_id: &str) -> Result<bool> {
        let count = self.conn.execute(
            "DELETE FROM reminders WHERE id = ?1 AND user_id = ?2",
            params![reminder_id, user_id],
        )?;
        Ok(count > 0)
    }

    pub fn list_reminders(
        &self,
        user_id: &str,
        query: &ReminderQuery,
    ) -> Result<(Vec<Reminder>, u32)> {
        let mut filters = String::from("user_id = ?1");
        let mut bind: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id.to_string())];

        if let Some(active) = query.active {
            bind.push(Box::new(active as i32));
            filters.push_str(&format!(" AND active = ?{}", bind.len()));
        }
        if let Some(ref medicine_id) = query.medicine_id {
            bind.push(Box::new(medicine_id.clone()));
            filters.push_str(&format!(" AND medicine_id = ?{}", bind.len()));
        }

        let count_sql = format!("SELECT COUNT(*) FROM reminders WHERE {filters}");
        let total: u32 = self.conn.query_row(
            &count_sql,
            rusqlite::params_from_iter(bind.iter()),
            |row| row.get(0),
        )?;

        let offset = (query.page.saturating_sub(1)) * query.per_page;
        let sql = format!(
            "SELECT {SELECT_COLS} FROM reminders WHERE {filters}
             ORDER BY reminder_time ASC LIMIT {} OFFSET {}",
            query.per_page, offset
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(bind.iter()), |row| map_row!(row))?;

        let mut reminders = Vec::new();
        for row in rows {
            reminders.push(row_to_reminder(row?)?);
        }
        Ok((reminders, total))
    }

    /// Active reminders whose validity window covers `date`, ordered by
    /// time of day. Recurrence filtering happens in core, not here.
    pub fn reminders_in_window(&self, user_id: &str, date: NaiveDate) -> Result<Vec<Reminder>> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM reminders
             WHERE user_id = ?1 AND active = 1 AND start_date <= ?2
               AND (end_date IS NULL OR end_date >= ?2)
             ORDER BY reminder_time ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, date.to_string()], |row| map_row!(row))?;

        let mut reminders = Vec::new();
        for row in rows {
            reminders.push(row_to_reminder(row?)?);
        }
        Ok(reminders)
    }

    /// Users with at least one active reminder, for scheduler ticks.
    pub fn user_ids_with_active_reminders(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT user_id FROM reminders WHERE active = 1 ORDER BY user_id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }
}
