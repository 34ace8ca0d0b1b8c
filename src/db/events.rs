use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::params;
use serde::Serialize;

use crate::models::event::{EventStatus, ReminderEvent};

use super::Database;

/// An event joined with its owning reminder's medicine context, for history
/// views and adherence reporting.
#[derive(Debug, Clone, Serialize)]
pub struct EventWithContext {
    #[serde(flatten)]
    pub event: ReminderEvent,
    pub medicine_id: String,
    pub medicine_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage_unit: Option<String>,
}

struct EventRow {
    id: String,
    reminder_id: String,
    scheduled_at: String,
    action_at: Option<String>,
    status: String,
    notes: Option<String>,
    created_at: String,
}

fn row_to_event(r: EventRow) -> Result<ReminderEvent> {
    let scheduled_at: NaiveDateTime = super::parse_stored_dt(&r.scheduled_at)?;
    let action_at: Option<NaiveDateTime> = match r.action_at {
        Some(ref s) => Some(super::parse_stored_dt(s)?),
        None => None,
    };
    let status: EventStatus = r.status.parse()?;
    let created_at: NaiveDateTime = super::parse_stored_dt(&r.created_at)?;

    Ok(ReminderEvent {
        id: r.id,
        reminder_id: r.reminder_id,
        scheduled_at,
        action_at,
        status,
        notes: r.notes,
        created_at,
    })
}

const SELECT_COLS: &str =
    "e.id, e.reminder_id, e.scheduled_at, e.action_at, e.status, e.notes, e.created_at";

macro_rules! map_event {
    ($row:expr) => {
        Ok(EventRow {
            id: $row.get(0)?,
            reminder_id: $row.get(1)?,
            scheduled_at: $row.get(2)?,
            action_at: $row.get(3)?,
            status: $row.get(4)?,
            notes: $row.get(5)?,
            created_at: $row.get(6)?,
        })
    };
}

fn day_bounds(date: NaiveDate) -> (String, String) {
    (format!("{date} 00:00:00"), format!("{date} 23:59:59"))
}

/// Shared WHERE clause + binds for ranged, filtered event queries.
fn range_filters(
    user_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    status: Option<EventStatus>,
    medicine_id: Option<&str>,
) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
    let (range_start, _) = day_bounds(start);
    let (_, range_end) = day_bounds(end);

    let mut filters =
        String::from("r.user_id = ?1 AND e.scheduled_at >= ?2 AND e.scheduled_at <= ?3");
    let mut bind: Vec<Box<dyn rusqlite::ToSql>> = vec![
        Box::new(user_id.to_string()),
        Box::new(range_start),
        Box::new(range_end),
    ];

    if let Some(status) = status {
        bind.push(Box::new(status.to_string()));
        filters.push_str(&format!(" AND e.status = ?{}", bind.len()));
    }
    if let Some(medicine_id) = medicine_id {
        bind.push(Box::new(medicine_id.to_string()));
        filters.push_str(&format!(" AND r.medicine_id = ?{}", bind.len()));
    }

    (filters, bind)
}

impl Database {
    /// Append one event row. Never deduplicates; resolution takes the
    /// most-recently-created row per (reminder, day).
    pub fn insert_event(&self, ev: &ReminderEvent) -> Result<()> {
        self.conn.execute(
            "INSERT INTO reminder_events (id, reminder_id, scheduled_at, action_at, status, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                ev.id,
                ev.reminder_id,
                ev.scheduled_at.to_string(),
                ev.action_at.map(|t| t.to_string()),
                ev.status.to_string(),
                ev.notes,
                ev.created_at.to_string(),
            ],
        )?;
        Ok(())
    }

    /// The most-recently-created event whose scheduled instant falls on the
    /// given calendar day, if any.
    pub fn latest_event_for_day(
        &self,
        reminder_id: &str,
        date: NaiveDate,
    ) -> Result<Option<ReminderEvent>> {
        let (start, end) = day_bounds(date);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM reminder_events e
             WHERE e.reminder_id = ?1 AND e.scheduled_at >= ?2 AND e.scheduled_at <= ?3
             ORDER BY e.created_at DESC, e.rowid DESC LIMIT 1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![reminder_id, start, end], |row| map_event!(row))?;
        match rows.next() {
            Some(row) => Ok(Some(row_to_event(row?)?)),
            None => Ok(None),
        }
    }

    /// All of a user's events in [start, end], with reminder/medicine
    /// context. Unordered; meant for aggregation.
    pub fn events_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        status: Option<EventStatus>,
        medicine_id: Option<&str>,
    ) -> Result<Vec<EventWithContext>> {
        let (filters, bind) = range_filters(user_id, start, end, status, medicine_id);
        let sql = format!(
            "SELECT {SELECT_COLS}, r.medicine_id, m.name, r.dosage_amount, r.dosage_unit
             FROM reminder_events e
             JOIN reminders r ON r.id = e.reminder_id
             JOIN medicines m ON m.id = r.medicine_id
             WHERE {filters}"
        );
        self.query_events_with_context(&sql, &bind)
    }

    /// Paginated history view: reverse chronological by scheduled instant.
    /// Returns the page plus the total match count.
    pub fn events_in_range_paged(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        status: Option<EventStatus>,
        medicine_id: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<EventWithContext>, u32)> {
        let (filters, bind) = range_filters(user_id, start, end, status, medicine_id);

        let count_sql = format!(
            "SELECT COUNT(*) FROM reminder_events e
             JOIN reminders r ON r.id = e.reminder_id
             WHERE {filters}"
        );
        let total: u32 = self.conn.query_row(
            &count_sql,
            rusqlite::params_from_iter(bind.iter()),
            |row| row.get(0),
        )?;

        let offset = (page.saturating_sub(1)) * per_page;
        let sql = format!(
            "SELECT {SELECT_COLS}, r.medicine_id, m.name, r.dosage_amount, r.dosage_unit
             FROM reminder_events e
             JOIN reminders r ON r.id = e.reminder_id
             JOIN medicines m ON m.id = r.medicine_id
             WHERE {filters}
             ORDER BY e.scheduled_at DESC LIMIT {per_page} OFFSET {offset}"
        );
        let events = self.query_events_with_context(&sql, &bind)?;
        Ok((events, total))
    }

    fn query_events_with_context(
        &self,
        sql: &str,
        bind: &[Box<dyn rusqlite::ToSql>],
    ) -> Result<Vec<EventWithContext>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(bind.iter()), |row| {
            let event_row: rusqlite::Result<EventRow> = map_event!(row);
            Ok((
                event_row?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
                row.get::<_, Option<String>>(9)?,
                row.get::<_, Option<String>>(10)?,
            ))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (event_row, medicine_id, medicine_name, dosage_amount, dosage_unit) = row?;
            events.push(EventWithContext {
                event: row_to_event(event_row)?,
                medicine_id,
                medicine_name,
                dosage_amount,
                dosage_unit,
            });
        }
        Ok(events)
    }
}
