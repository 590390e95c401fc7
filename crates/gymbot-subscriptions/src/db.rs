use rusqlite::Connection;

use crate::error::Result;

/// Initialise the subscribers table and its topic index.
///
/// Safe to call on every startup: uses `IF NOT EXISTS` throughout.
/// There is no uniqueness constraint: repeated opt-in stores repeated rows.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS subscribers (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            topic       TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_subscribers_topic
            ON subscribers(topic);",
    )?;
    Ok(())
}
