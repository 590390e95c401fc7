use std::sync::Mutex;

use rusqlite::Connection;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::types::{Subscriber, Topic};

/// Single-record operations on the subscriber collection.
///
/// No operation spans more than one record, so implementations need no
/// cross-record transactions. Calls are short and synchronous, so async
/// callers invoke them directly.
pub trait SubscriberStore: Send + Sync {
    /// Persist a new `{user_id, topic}` record. Never deduplicates.
    fn add(&self, user_id: &str, topic: Topic) -> Result<Subscriber>;

    fn get(&self, id: &str) -> Result<Option<Subscriber>>;

    /// All records for `topic`, oldest first.
    fn find_by_topic(&self, topic: Topic) -> Result<Vec<Subscriber>>;
}

/// SQLite-backed subscriber collection.
///
/// Wraps a single connection in a `Mutex`; each call holds the lock for
/// exactly one statement.
pub struct SqliteSubscriberStore {
    db: Mutex<Connection>,
}

impl SqliteSubscriberStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }
}

impl SubscriberStore for SqliteSubscriberStore {
    #[instrument(skip(self), fields(topic = %topic))]
    fn add(&self, user_id: &str, topic: Topic) -> Result<Subscriber> {
        let subscriber = Subscriber {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.to_string(),
            topic,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO subscribers (id, user_id, topic, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                subscriber.id,
                subscriber.user_id,
                topic.as_str(),
                subscriber.created_at
            ],
        )?;
        debug!(id = %subscriber.id, "subscriber added");
        Ok(subscriber)
    }

    #[instrument(skip(self))]
    fn get(&self, id: &str) -> Result<Option<Subscriber>> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            "SELECT id, user_id, topic, created_at FROM subscribers WHERE id = ?1",
            rusqlite::params![id],
            row_to_raw,
        ) {
            Ok(raw) => raw.into_subscriber().map(Some),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    #[instrument(skip(self), fields(topic = %topic))]
    fn find_by_topic(&self, topic: Topic) -> Result<Vec<Subscriber>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT id, user_id, topic, created_at
             FROM subscribers
             WHERE topic = ?1
             ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map(rusqlite::params![topic.as_str()], row_to_raw)?;

        let mut subscribers = Vec::new();
        for raw in rows {
            subscribers.push(raw?.into_subscriber()?);
        }
        debug!(count = subscribers.len(), "subscribers found");
        Ok(subscribers)
    }
}

/// Row before the topic column is validated.
struct RawSubscriber {
    id: String,
    user_id: String,
    topic: String,
    created_at: String,
}

impl RawSubscriber {
    fn into_subscriber(self) -> Result<Subscriber> {
        Ok(Subscriber {
            id: self.id,
            user_id: self.user_id,
            topic: self.topic.parse()?,
            created_at: self.created_at,
        })
    }
}

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSubscriber> {
    Ok(RawSubscriber {
        id: row.get(0)?,
        user_id: row.get(1)?,
        topic: row.get(2)?,
        created_at: row.get(3)?,
    })
}
