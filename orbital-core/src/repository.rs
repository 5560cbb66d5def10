use async_trait::async_trait;
use chrono::Weekday;

use crate::booking::{Booking, NewBooking};
use crate::destination::Destination;
use crate::schedule::ScheduleEntry;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

/// Weekly (launchpad, weekday) -> destination mapping.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Launchpad serving `destination` on `day`. If several rows match, the
    /// most recently updated one wins, then the lowest id.
    async fn find_launchpad(
        &self,
        destination: Destination,
        day: Weekday,
    ) -> Result<Option<String>, StoreError>;

    /// Insert-or-update keyed on (launchpad_id, day_of_week). On conflict the
    /// destination and `updated_at` are overwritten and `created_at` is kept.
    /// Either every entry is applied or none is.
    async fn upsert_entries(&self, entries: &[ScheduleEntry]) -> Result<usize, StoreError>;

    async fn list_entries(&self) -> Result<Vec<ScheduleEntry>, StoreError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert_booking(&self, booking: &NewBooking) -> Result<i64, StoreError>;

    async fn list_bookings(&self) -> Result<Vec<Booking>, StoreError>;

    /// Returns false when no row had that id.
    async fn delete_booking(&self, id: i64) -> Result<bool, StoreError>;
}
