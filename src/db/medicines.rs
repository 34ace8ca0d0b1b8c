use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::params;

use crate::models::medicine::Medicine;

use super::Database;

struct MedicineRow {
    id: String,
    user_id: String,
    name: String,
    notes: Option<String>,
    created_at: String,
}

fn row_to_medicine(r: MedicineRow) -> Result<Medicine> {
    let created_at: NaiveDateTime = super::parse_stored_dt(&r.created_at)?;
    Ok(Medicine {
        id: r.id,
        user_id: r.user_id,
        name: r.name,
        notes: r.notes,
        created_at,
    })
}

const SELECT_COLS: &str = "id, user_id, name, notes, created_at";

macro_rules! map_row {
    ($row:expr) => {
        Ok(MedicineRow {
            id: $row.get(0)?,
            user_id: $row.get(1)?,
            name: $row.get(2)?,
            notes: $row.get(3)?,
            created_at: $row.get(4)?,
        })
    };
}

impl Database {
    pub fn insert_medicine(&self, med: &Medicine) -> Result<()> {
        self.conn.execute(
            "INSERT INTO medicines (id, user_id, name, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                med.id,
                med.user_id,
                med.name,
                med.notes,
                med.created_at.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Look up a medicine by id, scoped to its owner. The ownership check at
    /// reminder creation goes through here.
    pub fn get_medicine(&self, medicine_id: &str, user_id: &str) -> Result<Option<Medicine>> {
        let sql = format!("SELECT {SELECT_COLS} FROM medicines WHERE id = ?1 AND user_id = ?2");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![medicine_id, user_id], |row| map_row!(row))?;
        match rows.next() {
            Some(row) => Ok(Some(row_to_medicine(row?)?)),
            None => Ok(None),
        }
    }

    pub fn get_medicine_by_name(&self, name: &str, user_id: &str) -> Result<Option<Medicine>> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM medicines WHERE name = ?1 AND user_id = ?2 LIMIT 1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![name, user_id], |row| map_row!(row))?;
        match rows.next() {
            Some(row) => Ok(Some(row_to_medicine(row?)?)),
            None => Ok(None),
        }
    }

    pub fn list_medicines(&self, user_id: &str) -> Result<Vec<Medicine>> {
        let sql = format!("SELECT {SELECT_COLS} FROM medicines WHERE user_id = ?1 ORDER BY name ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id], |row| map_row!(row))?;

        let mut meds = Vec::new();
        for row in rows {
            meds.push(row_to_medicine(row?)?);
        }
        Ok(meds)
    }
}
