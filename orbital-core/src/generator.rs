use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::info;

use crate::destination::Destination;
use crate::directory::{GatewayError, LaunchDirectory};
use crate::repository::{ScheduleRepository, StoreError};
use crate::schedule::{ScheduleEntry, WEEK};

/// Unbiased permutation of the seven destinations.
pub fn shuffled_destinations<R: Rng + ?Sized>(rng: &mut R) -> [Destination; 7] {
    let mut destinations = Destination::ALL;
    destinations.shuffle(rng);
    destinations
}

/// One week per launchpad: weekday `i` (Sunday first) gets `permutation[i]`.
/// Produces exactly `7 * launchpads.len()` entries, ids numbered from 1.
pub fn generate_schedule<R: Rng + ?Sized>(
    launchpads: &[String],
    rng: &mut R,
    generated_at: DateTime<Utc>,
) -> Vec<ScheduleEntry> {
    let mut schedule = Vec::with_capacity(launchpads.len() * WEEK.len());

    for launchpad_id in launchpads {
        let destinations = shuffled_destinations(rng);
        for (day, destination) in WEEK.iter().zip(destinations) {
            schedule.push(ScheduleEntry {
                id: schedule.len() as i64 + 1,
                launchpad_id: launchpad_id.clone(),
                destination,
                day_of_week: *day,
                created_at: generated_at,
                updated_at: generated_at,
            });
        }
    }

    schedule
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleJobError {
    #[error("failed to fetch active launchpads: {0}")]
    Directory(#[from] GatewayError),
    #[error("failed to store schedule: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleReport {
    pub launchpads: usize,
    pub entries: usize,
    pub generated_at: DateTime<Utc>,
}

/// Batch run: active launchpads -> weekly schedule -> store.
pub struct ScheduleJob {
    directory: Arc<dyn LaunchDirectory>,
    schedules: Arc<dyn ScheduleRepository>,
}

impl ScheduleJob {
    pub fn new(directory: Arc<dyn LaunchDirectory>, schedules: Arc<dyn ScheduleRepository>) -> Self {
        Self { directory, schedules }
    }

    /// Nothing is written unless the launchpad list was fetched and the whole
    /// schedule generated; the store applies the batch all-or-nothing.
    pub async fn run<R: Rng + Send + ?Sized>(&self, rng: &mut R) -> Result<ScheduleReport, ScheduleJobError> {
        let launchpads = self.directory.active_launchpads().await?;
        info!("Generating schedule for {} active launchpads", launchpads.len());

        let generated_at = Utc::now();
        let entries = generate_schedule(&launchpads, rng, generated_at);
        let written = self.schedules.upsert_entries(&entries).await?;

        info!("Stored {} schedule entries", written);
        Ok(ScheduleReport {
            launchpads: launchpads.len(),
            entries: written,
            generated_at,
        })
    }
}
