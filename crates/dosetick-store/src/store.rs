use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use tracing::{debug, instrument};
use uuid::Uuid;

use dosetick_core::{DayOfWeek, Medication, MedicationId, TimeOfDay};

use crate::db::init_db;
use crate::error::{Result, StoreError};

/// Storage format for dose-log timestamps — lexical order equals time order.
const TAKEN_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Thread-safe manager for the medication list and dose log.
///
/// Wraps a single SQLite connection in a `Mutex`; all reminder traffic goes
/// through one host task, so a pool is not worth its weight here.
pub struct MedicationStore {
    db: Mutex<Connection>,
}

impl MedicationStore {
    /// Wrap an already-open connection, initialising the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Add a medication.
    ///
    /// This is the data-entry boundary the reminder engine relies on:
    /// the time must parse as `HH:MM` (stored zero-padded) and a weekday
    /// restriction, if given, must not be empty.
    #[instrument(skip(self), fields(name, time))]
    pub fn add(&self, name: &str, time: &str, days: Option<Vec<DayOfWeek>>) -> Result<Medication> {
        let parsed: TimeOfDay = time
            .parse()
            .map_err(|e| StoreError::InvalidTime(format!("{e}")))?;
        if let Some(ref days) = days {
            if days.is_empty() {
                return Err(StoreError::EmptyDays);
            }
        }

        let med = Medication {
            id: MedicationId::new(),
            name: name.to_string(),
            time: parsed.to_string(),
            days,
        };
        let days_json = med
            .days
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let now = chrono::Utc::now().to_rfc3339();

        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO medications (id, name, time, days, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![med.id.as_str(), med.name, med.time, days_json, now],
        )?;
        debug!(medication_id = %med.id, "medication added");
        Ok(med)
    }

    /// Remove a medication by ID. The dose log keeps its history rows.
    #[instrument(skip(self), fields(id = %id))]
    pub fn remove(&self, id: &MedicationId) -> Result<()> {
        let db = self.db.lock().unwrap();
        let n = db.execute(
            "DELETE FROM medications WHERE id = ?1",
            rusqlite::params![id.as_str()],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound {
                id: id.as_str().to_string(),
            });
        }
        debug!(medication_id = %id, "medication removed");
        Ok(())
    }

    /// All medications, ordered by scheduled time then name.
    pub fn list_all(&self) -> Result<Vec<Medication>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT id, name, time, days FROM medications ORDER BY time, name",
        )?;
        let meds = stmt
            .query_map([], row_to_medication)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(meds)
    }

    /// Record that a dose was taken at the given local instant.
    #[instrument(skip(self), fields(id = %id))]
    pub fn record_taken(&self, id: &MedicationId, at: NaiveDateTime) -> Result<()> {
        let db = self.db.lock().unwrap();
        let exists: bool = db.query_row(
            "SELECT EXISTS(SELECT 1 FROM medications WHERE id = ?1)",
            rusqlite::params![id.as_str()],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StoreError::NotFound {
                id: id.as_str().to_string(),
            });
        }

        db.execute(
            "INSERT INTO dose_log (id, medication_id, taken_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![
                Uuid::new_v4().to_string(),
                id.as_str(),
                at.format(TAKEN_AT_FORMAT).to_string()
            ],
        )?;
        debug!(medication_id = %id, "dose recorded as taken");
        Ok(())
    }

    /// IDs of medications with a dose logged on `date`.
    pub fn taken_on(&self, date: NaiveDate) -> Result<HashSet<MedicationId>> {
        let start = date.format("%Y-%m-%dT00:00:00").to_string();
        let end = (date + Duration::days(1))
            .format("%Y-%m-%dT00:00:00")
            .to_string();

        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT DISTINCT medication_id FROM dose_log
             WHERE taken_at >= ?1 AND taken_at < ?2",
        )?;
        let ids = stmt
            .query_map(rusqlite::params![start, end], |row| {
                row.get::<_, String>(0)
            })?
            .filter_map(|r| r.ok())
            .map(MedicationId::from)
            .collect();
        Ok(ids)
    }

    /// The list the host feeds the reminder engine: medications scheduled
    /// on `now`'s weekday, minus those already taken today.
    pub fn due_today(&self, now: NaiveDateTime) -> Result<Vec<Medication>> {
        let taken = self.taken_on(now.date())?;
        let weekday = now.weekday();
        let due = self
            .list_all()?
            .into_iter()
            .filter(|med| med.is_scheduled_on(weekday) && !taken.contains(&med.id))
            .collect();
        Ok(due)
    }
}

/// Map a SQLite row to a `Medication`.
///
/// A malformed `days` value degrades to "every day" rather than dropping
/// the row — the reminder engine has its own guard for bad data.
fn row_to_medication(row: &rusqlite::Row<'_>) -> rusqlite::Result<Medication> {
    let days_json: Option<String> = row.get(3)?;
    let days = days_json.and_then(|json| serde_json::from_str::<Vec<DayOfWeek>>(&json).ok());

    Ok(Medication {
        id: MedicationId::from(row.get::<_, String>(0)?),
        name: row.get(1)?,
        time: row.get(2)?,
        days,
    })
}
