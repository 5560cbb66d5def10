use async_trait::async_trait;
use chrono::{DateTime, Utc, Weekday};
use orbital_core::schedule::{day_index, weekday_from_index};
use orbital_core::{Destination, ScheduleEntry, ScheduleRepository, StoreError};
use sqlx::PgPool;
use tracing::debug;

use crate::database::db_err;

const UPSERT_SCHEDULE: &str = r#"
    INSERT INTO schedules (launchpad_id, destination_id, day_of_week, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (launchpad_id, day_of_week) DO UPDATE
    SET destination_id = EXCLUDED.destination_id,
        updated_at = EXCLUDED.updated_at
"#;

pub struct PgScheduleRepository {
    pool: PgPool,
}

impl PgScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ScheduleRow {
    id: i64,
    launchpad_id: String,
    destination_id: i16,
    day_of_week: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ScheduleRow> for ScheduleEntry {
    type Error = StoreError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        let destination = Destination::try_from(row.destination_id)
            .map_err(|e| StoreError::CorruptRow(format!("schedule {}: {}", row.id, e)))?;
        let day_of_week = weekday_from_index(row.day_of_week).ok_or_else(|| {
            StoreError::CorruptRow(format!("schedule {}: day_of_week {}", row.id, row.day_of_week))
        })?;

        Ok(ScheduleEntry {
            id: row.id,
            launchpad_id: row.launchpad_id,
            destination,
            day_of_week,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ScheduleRepository for PgScheduleRepository {
    async fn find_launchpad(
        &self,
        destination: Destination,
        day: Weekday,
    ) -> Result<Option<String>, StoreError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT launchpad_id FROM schedules
            WHERE destination_id = $1 AND day_of_week = $2
            ORDER BY updated_at DESC, id
            LIMIT 1
            "#,
        )
        .bind(destination.id() as i16)
        .bind(day_index(day))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)
    }

    async fn upsert_entries(&self, entries: &[ScheduleEntry]) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        for entry in entries {
            sqlx::query(UPSERT_SCHEDULE)
                .bind(&entry.launchpad_id)
                .bind(entry.destination.id() as i16)
                .bind(entry.day_index())
                .bind(entry.created_at)
                .bind(entry.updated_at)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        // Dropping the transaction on an earlier error rolls everything back.
        tx.commit().await.map_err(db_err)?;
        debug!("Upserted {} schedule entries", entries.len());
        Ok(entries.len())
    }

    async fn list_entries(&self) -> Result<Vec<ScheduleEntry>, StoreError> {
        let rows = sqlx::query_as::<_, ScheduleRow>(
            r#"
            SELECT id, launchpad_id, destination_id, day_of_week, created_at, updated_at
            FROM schedules
            ORDER BY launchpad_id, day_of_week
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(ScheduleEntry::try_from).collect()
    }
}
