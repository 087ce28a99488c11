use rusqlite::Connection;

use crate::error::Result;

/// Initialise the store schema in `conn`.
///
/// Creates the `medications` and `dose_log` tables (idempotent) and an index
/// so the taken-today query stays cheap as the log grows.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS medications (
            id          TEXT    NOT NULL PRIMARY KEY,
            name        TEXT    NOT NULL,
            time        TEXT    NOT NULL,   -- HH:MM local time of day
            days        TEXT,               -- JSON weekday tags; NULL means every day
            created_at  TEXT    NOT NULL,
            updated_at  TEXT    NOT NULL
        ) STRICT;

        CREATE TABLE IF NOT EXISTS dose_log (
            id              TEXT NOT NULL PRIMARY KEY,
            medication_id   TEXT NOT NULL,
            taken_at        TEXT NOT NULL   -- local datetime, sortable form
        ) STRICT;

        -- Taken-today lookups: SELECT … WHERE taken_at >= ? AND taken_at < ?
        CREATE INDEX IF NOT EXISTS idx_dose_log_taken_at ON dose_log (taken_at, medication_id);
        ",
    )?;
    Ok(())
}
