//! PostgreSQL implementation of the event log.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::models::StoredEvent;
use crate::config::LedgerConfig;
use crate::domain::LedgerEvent;
use crate::error::LedgerError;

const CREATE_EVENTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS ledger_events (\
     id BIGSERIAL PRIMARY KEY, \
     entity_id UUID NOT NULL, \
     event_type TEXT NOT NULL, \
     payload JSONB NOT NULL, \
     created_at TIMESTAMPTZ NOT NULL DEFAULT now())";

const CREATE_EVENTS_INDEX: &str = "CREATE INDEX IF NOT EXISTS ledger_events_entity_idx \
     ON ledger_events (entity_id, created_at)";

/// PostgreSQL-backed event log using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool from `config` and makes sure the schema
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError::PersistenceError`] if the database is
    /// unreachable or the schema cannot be created.
    pub async fn connect(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;
        let persistence = Self::new(pool);
        persistence.ensure_schema().await?;
        Ok(persistence)
    }

    /// Creates the `ledger_events` table and index if missing.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError::PersistenceError`] on database failure.
    pub async fn ensure_schema(&self) -> Result<(), LedgerError> {
        for statement in [CREATE_EVENTS_TABLE, CREATE_EVENTS_INDEX] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;
        }
        Ok(())
    }

    /// Appends an event to the event log.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError::PersistenceError`] on serialization or
    /// database failure.
    pub async fn save_event(&self, event: &LedgerEvent) -> Result<i64, LedgerError> {
        let payload = serde_json::to_value(event)
            .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;

        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO ledger_events (entity_id, event_type, payload) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(event.entity_id())
        .bind(event.event_type_str())
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;

        Ok(row)
    }

    /// Loads events after the given timestamp, optionally filtered by
    /// entity (schedule or member) ID.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError::PersistenceError`] on database failure.
    pub async fn load_events_after(
        &self,
        after: DateTime<Utc>,
        entity_id: Option<Uuid>,
    ) -> Result<Vec<StoredEvent>, LedgerError> {
        let rows = if let Some(eid) = entity_id {
            sqlx::query_as::<_, (i64, Uuid, String, serde_json::Value, DateTime<Utc>)>(
                "SELECT id, entity_id, event_type, payload, created_at FROM ledger_events \
                 WHERE created_at > $1 AND entity_id = $2 ORDER BY created_at ASC",
            )
            .bind(after)
            .bind(eid)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, (i64, Uuid, String, serde_json::Value, DateTime<Utc>)>(
                "SELECT id, entity_id, event_type, payload, created_at FROM ledger_events \
                 WHERE created_at > $1 ORDER BY created_at ASC",
            )
            .bind(after)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, entity_id, event_type, payload, created_at)| StoredEvent {
                    id,
                    entity_id,
                    event_type,
                    payload,
                    created_at,
                },
            )
            .collect())
    }

    /// Deletes events older than the given number of days.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError::PersistenceError`] on database failure.
    pub async fn delete_old_events(&self, before_days: u64) -> Result<u64, LedgerError> {
        let Some(age) = i64::try_from(before_days)
            .ok()
            .and_then(chrono::Duration::try_days)
        else {
            return Ok(0);
        };
        let cutoff = Utc::now() - age;

        let result = sqlx::query("DELETE FROM ledger_events WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| LedgerError::PersistenceError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
