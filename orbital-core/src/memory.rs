//! In-memory stores and a scripted launch directory, used by the test suites
//! and for running the API without Postgres or network access.

use async_trait::async_trait;
use chrono::{DateTime, Utc, Weekday};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::booking::{Booking, NewBooking};
use crate::dates::DayWindow;
use crate::destination::Destination;
use crate::directory::{GatewayError, LaunchDirectory};
use crate::repository::{BookingRepository, ScheduleRepository, StoreError};
use crate::schedule::{day_index, ScheduleEntry};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn check_available(unavailable: &AtomicBool) -> Result<(), StoreError> {
    if unavailable.load(Ordering::SeqCst) {
        return Err(StoreError::Database("store unavailable".to_string()));
    }
    Ok(())
}

#[derive(Default)]
struct ScheduleState {
    rows: BTreeMap<(String, i16), ScheduleEntry>,
    last_id: i64,
}

#[derive(Default)]
pub struct InMemoryScheduleRepository {
    state: Mutex<ScheduleState>,
    unavailable: AtomicBool,
}

impl InMemoryScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one row, bypassing the upsert path. Seeded rows are stamped with
    /// the Unix epoch so any later upsert outranks them.
    pub fn with_entry(self, launchpad_id: &str, day: Weekday, destination: Destination) -> Self {
        {
            let mut state = lock(&self.state);
            state.last_id += 1;
            let now = DateTime::<Utc>::UNIX_EPOCH;
            let entry = ScheduleEntry {
                id: state.last_id,
                launchpad_id: launchpad_id.to_string(),
                destination,
                day_of_week: day,
                created_at: now,
                updated_at: now,
            };
            state.rows.insert((launchpad_id.to_string(), day_index(day)), entry);
        }
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        lock(&self.state).rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository {
    async fn find_launchpad(
        &self,
        destination: Destination,
        day: Weekday,
    ) -> Result<Option<String>, StoreError> {
        check_available(&self.unavailable)?;
        let state = lock(&self.state);
        Ok(state
            .rows
            .values()
            .filter(|e| e.destination == destination && e.day_of_week == day)
            .min_by_key(|e| (Reverse(e.updated_at), e.id))
            .map(|e| e.launchpad_id.clone()))
    }

    async fn upsert_entries(&self, entries: &[ScheduleEntry]) -> Result<usize, StoreError> {
        check_available(&self.unavailable)?;
        let mut state = lock(&self.state);
        for entry in entries {
            let key = (entry.launchpad_id.clone(), entry.day_index());
            match state.rows.get_mut(&key) {
                Some(existing) => {
                    existing.destination = entry.destination;
                    existing.updated_at = entry.updated_at;
                }
                None => {
                    state.last_id += 1;
                    let row = ScheduleEntry {
                        id: state.last_id,
                        ..entry.clone()
                    };
                    state.rows.insert(key, row);
                }
            }
        }
        Ok(entries.len())
    }

    async fn list_entries(&self) -> Result<Vec<ScheduleEntry>, StoreError> {
        check_available(&self.unavailable)?;
        Ok(lock(&self.state).rows.values().cloned().collect())
    }
}

#[derive(Default)]
struct BookingState {
    rows: BTreeMap<i64, Booking>,
    last_id: i64,
}

#[derive(Default)]
pub struct InMemoryBookingRepository {
    state: Mutex<BookingState>,
    unavailable: AtomicBool,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        lock(&self.state).rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert_booking(&self, booking: &NewBooking) -> Result<i64, StoreError> {
        check_available(&self.unavailable)?;
        let mut state = lock(&self.state);
        state.last_id += 1;
        let id = state.last_id;
        state.rows.insert(id, booking.clone().into_booking(id));
        Ok(id)
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        check_available(&self.unavailable)?;
        Ok(lock(&self.state).rows.values().cloned().collect())
    }

    async fn delete_booking(&self, id: i64) -> Result<bool, StoreError> {
        check_available(&self.unavailable)?;
        Ok(lock(&self.state).rows.remove(&id).is_some())
    }
}

#[derive(Debug, Clone)]
struct ScheduledLaunch {
    id: String,
    launchpad_id: String,
    date_utc: DateTime<Utc>,
}

/// Launch directory answering from a fixed script.
#[derive(Default)]
pub struct StaticLaunchDirectory {
    launchpads: BTreeMap<String, String>,
    launches: Vec<ScheduledLaunch>,
    unavailable: AtomicBool,
    launch_queries: AtomicUsize,
}

impl StaticLaunchDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_launchpad(mut self, launchpad_id: &str, status: &str) -> Self {
        self.launchpads.insert(launchpad_id.to_string(), status.to_string());
        self
    }

    pub fn with_launch(mut self, launch_id: &str, launchpad_id: &str, date_utc: DateTime<Utc>) -> Self {
        self.launches.push(ScheduledLaunch {
            id: launch_id.to_string(),
            launchpad_id: launchpad_id.to_string(),
            date_utc,
        });
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `launches_at` calls served so far.
    pub fn launch_queries(&self) -> usize {
        self.launch_queries.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), GatewayError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GatewayError::Timeout);
        }
        Ok(())
    }
}

#[async_trait]
impl LaunchDirectory for StaticLaunchDirectory {
    async fn launches_at(
        &self,
        launchpad_id: &str,
        window: &DayWindow,
    ) -> Result<Vec<String>, GatewayError> {
        self.launch_queries.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self
            .launches
            .iter()
            .filter(|l| l.launchpad_id == launchpad_id && window.contains(l.date_utc))
            .map(|l| l.id.clone())
            .collect())
    }

    async fn active_launchpads(&self) -> Result<Vec<String>, GatewayError> {
        self.check_available()?;
        Ok(self
            .launchpads
            .iter()
            .filter(|(_, status)| status.as_str() == "active")
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn launchpad_status(&self, launchpad_id: &str) -> Result<String, GatewayError> {
        self.check_available()?;
        self.launchpads
            .get(launchpad_id)
            .cloned()
            .ok_or(GatewayError::UnexpectedStatus(404))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(launchpad_id: &str, day: Weekday, destination: Destination, at: DateTime<Utc>) -> ScheduleEntry {
        ScheduleEntry {
            id: 0,
            launchpad_id: launchpad_id.to_string(),
            destination,
            day_of_week: day,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_upsert_overwrites_and_keeps_created_at() {
        let repo = InMemoryScheduleRepository::new();
        let first = Utc.with_ymd_and_hms(2049, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2049, 1, 8, 0, 0, 0).unwrap();

        repo.upsert_entries(&[entry("LP1", Weekday::Mon, Destination::Mars, first)])
            .await
            .unwrap();
        repo.upsert_entries(&[entry("LP1", Weekday::Mon, Destination::Titan, second)])
            .await
            .unwrap();

        let rows = repo.list_entries().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].destination, Destination::Titan);
        assert_eq!(rows[0].created_at, first);
        assert_eq!(rows[0].updated_at, second);
    }

    #[tokio::test]
    async fn test_find_launchpad_ties_break_on_lowest_id() {
        let repo = InMemoryScheduleRepository::new()
            .with_entry("LP-B", Weekday::Fri, Destination::Moon)
            .with_entry("LP-A", Weekday::Fri, Destination::Moon);

        let found = repo.find_launchpad(Destination::Moon, Weekday::Fri).await.unwrap();
        assert_eq!(found.as_deref(), Some("LP-B"));
        assert_eq!(repo.find_launchpad(Destination::Moon, Weekday::Sat).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_launchpad_prefers_latest_generation() {
        let repo = InMemoryScheduleRepository::new();
        let first = Utc.with_ymd_and_hms(2049, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2049, 1, 8, 0, 0, 0).unwrap();

        // LP-OLD left the active set before the second run and was never rewritten.
        repo.upsert_entries(&[entry("LP-OLD", Weekday::Fri, Destination::Moon, first)])
            .await
            .unwrap();
        repo.upsert_entries(&[entry("LP-NEW", Weekday::Fri, Destination::Moon, second)])
            .await
            .unwrap();

        let found = repo.find_launchpad(Destination::Moon, Weekday::Fri).await.unwrap();
        assert_eq!(found.as_deref(), Some("LP-NEW"));
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_directory_window_filter() {
        let directory = StaticLaunchDirectory::new()
            .with_launch("L1", "LP1", Utc.with_ymd_and_hms(2049, 5, 3, 23, 0, 0).unwrap())
            .with_launch("L2", "LP1", Utc.with_ymd_and_hms(2049, 5, 4, 0, 0, 0).unwrap());

        let window = DayWindow::for_date(chrono::NaiveDate::from_ymd_opt(2049, 5, 3).unwrap()).unwrap();
        let hits = directory.launches_at("LP1", &window).await.unwrap();
        assert_eq!(hits, vec!["L1".to_string()]);
        assert!(directory.launches_at("LP2", &window).await.unwrap().is_empty());
        assert_eq!(directory.launch_queries(), 2);
    }
}
