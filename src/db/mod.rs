mod events;
mod medicines;
mod migrate;
mod reminders;

pub use events::EventWithContext;
pub use reminders::ReminderQuery;

use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::path::Path;

/// Parse a `NaiveDateTime` as persisted by `NaiveDateTime::to_string()`.
///
/// chrono's `Display` renders a space between date and time
/// (`2025-06-10 08:00:00[.fff]`), but its `FromStr` only accepts the `T`
/// separator — so the stored form must be parsed with an explicit format.
pub(crate) fn parse_stored_dt(s: &str) -> Result<NaiveDateTime> {
    Ok(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")?)
}

pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            use std::fs::{self, OpenOptions};
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            if !path.exists() {
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .mode(0o600)
                    .open(&path)?;
            } else {
                let mut perms = fs::metadata(&path)?.permissions();
                if perms.mode() & 0o777 != 0o600 {
                    perms.set_mode(0o600);
                    fs::set_permissions(&path, perms)?;
                }
            }
        }

        let conn = Connection::open(path)?;
        // Reminder events are cascade-deleted with their reminder
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Self { conn };
        migrate::run(&db.conn)?;
        Ok(db)
    }
}
