use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use tracing::{info, warn};

use crate::availability::AvailabilityCheck;
use crate::booking::{Booking, BookingRequest, NewBooking};
use crate::destination::Destination;
use crate::repository::{BookingRepository, ScheduleRepository};
use crate::{BookingError, BookingResult};

/// Turns a destination + date request into a concrete launchpad and a
/// committed booking. Holds no state between calls.
pub struct BookingResolver {
    schedules: Arc<dyn ScheduleRepository>,
    bookings: Arc<dyn BookingRepository>,
    availability: Arc<dyn AvailabilityCheck>,
    empty_list_not_found: bool,
}

impl BookingResolver {
    pub fn new(
        schedules: Arc<dyn ScheduleRepository>,
        bookings: Arc<dyn BookingRepository>,
        availability: Arc<dyn AvailabilityCheck>,
    ) -> Self {
        Self {
            schedules,
            bookings,
            availability,
            empty_list_not_found: false,
        }
    }

    /// When enabled, listing an empty store fails with `NotFound` instead of
    /// returning an empty list.
    pub fn with_empty_list_not_found(mut self, enabled: bool) -> Self {
        self.empty_list_not_found = enabled;
        self
    }

    pub async fn resolve_launchpad(
        &self,
        destination: Destination,
        launch_date: NaiveDate,
    ) -> BookingResult<String> {
        let weekday = launch_date.weekday();
        self.schedules
            .find_launchpad(destination, weekday)
            .await?
            .ok_or(BookingError::NoScheduleForDestination { destination, weekday })
    }

    pub async fn create_booking(&self, request: BookingRequest) -> BookingResult<Booking> {
        // 1. Destination + weekday -> launchpad
        let launchpad_id = self
            .resolve_launchpad(request.destination, request.launch_date)
            .await
            .inspect_err(|e| warn!("Launchpad resolution failed: {}", e))?;

        // 2. External occupancy
        self.availability
            .ensure_available(&launchpad_id, request.launch_date)
            .await
            .inspect_err(|e| warn!("Availability check failed for {}: {}", launchpad_id, e))?;

        // 3. Persist
        let new_booking = NewBooking::from_request(request, launchpad_id);
        let id = self.bookings.insert_booking(&new_booking).await?;

        info!(
            booking_id = id,
            launchpad_id = %new_booking.launchpad_id,
            destination = %new_booking.destination,
            launch_date = %new_booking.launch_date,
            "Booking confirmed"
        );

        Ok(new_booking.into_booking(id))
    }

    pub async fn list_bookings(&self) -> BookingResult<Vec<Booking>> {
        let bookings = self.bookings.list_bookings().await?;
        if bookings.is_empty() && self.empty_list_not_found {
            return Err(BookingError::NotFound("No bookings found".to_string()));
        }
        Ok(bookings)
    }

    pub async fn delete_booking(&self, id: i64) -> BookingResult<()> {
        if !self.bookings.delete_booking(id).await? {
            return Err(BookingError::NotFound(format!("Booking {} not found", id)));
        }
        info!(booking_id = id, "Booking deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::AvailabilityStrategy;
    use crate::memory::{InMemoryBookingRepository, InMemoryScheduleRepository, StaticLaunchDirectory};
    use chrono::{TimeZone, Utc, Weekday};
    use orbital_shared::Masked;

    struct Fixture {
        schedules: Arc<InMemoryScheduleRepository>,
        bookings: Arc<InMemoryBookingRepository>,
        directory: Arc<StaticLaunchDirectory>,
        resolver: BookingResolver,
    }

    fn fixture(schedules: InMemoryScheduleRepository, directory: StaticLaunchDirectory) -> Fixture {
        let schedules = Arc::new(schedules);
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let directory = Arc::new(directory);
        let resolver = BookingResolver::new(
            schedules.clone(),
            bookings.clone(),
            AvailabilityStrategy::LaunchWindow.build(directory.clone()),
        );
        Fixture { schedules, bookings, directory, resolver }
    }

    // 2049-05-03 is a Monday, 2049-05-04 a Tuesday.
    fn request(destination: Destination, day: u32) -> BookingRequest {
        BookingRequest {
            first_name: Masked::from("Ada"),
            last_name: Masked::from("Lovelace"),
            gender: "female".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            destination,
            launch_date: NaiveDate::from_ymd_opt(2049, 5, day).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_booking_created_on_scheduled_pad() {
        let f = fixture(
            InMemoryScheduleRepository::new().with_entry("LP1", Weekday::Mon, Destination::Mars),
            StaticLaunchDirectory::new(),
        );

        let booking = f.resolver.create_booking(request(Destination::Mars, 3)).await.unwrap();
        assert_eq!(booking.launchpad_id, "LP1");
        assert_eq!(booking.destination, Destination::Mars);
        assert_eq!(booking.launch_date, NaiveDate::from_ymd_opt(2049, 5, 3).unwrap());

        let stored = f.bookings.list_bookings().await.unwrap();
        assert_eq!(stored, vec![booking]);
    }

    #[tokio::test]
    async fn test_external_conflict_blocks_insert() {
        let f = fixture(
            InMemoryScheduleRepository::new().with_entry("LP1", Weekday::Mon, Destination::Mars),
            StaticLaunchDirectory::new()
                .with_launch("starlink-42", "LP1", Utc.with_ymd_and_hms(2049, 5, 3, 14, 0, 0).unwrap()),
        );

        let err = f.resolver.create_booking(request(Destination::Mars, 3)).await.unwrap_err();
        match err {
            BookingError::LaunchpadAlreadyReserved { launchpad_id, date } => {
                assert_eq!(launchpad_id, "LP1");
                assert_eq!(date, NaiveDate::from_ymd_opt(2049, 5, 3).unwrap());
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(f.bookings.is_empty());
    }

    #[tokio::test]
    async fn test_missing_schedule_for_weekday() {
        let f = fixture(
            InMemoryScheduleRepository::new().with_entry("LP1", Weekday::Mon, Destination::Moon),
            StaticLaunchDirectory::new(),
        );

        let err = f.resolver.create_booking(request(Destination::Moon, 4)).await.unwrap_err();
        match err {
            BookingError::NoScheduleForDestination { destination, weekday } => {
                assert_eq!(destination, Destination::Moon);
                assert_eq!(weekday, Weekday::Tue);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(f.bookings.is_empty());
        // resolution fails before the directory is consulted
        assert_eq!(f.directory.launch_queries(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_surfaces() {
        let f = fixture(
            InMemoryScheduleRepository::new().with_entry("LP1", Weekday::Mon, Destination::Mars),
            StaticLaunchDirectory::new(),
        );
        f.directory.set_unavailable(true);

        let err = f.resolver.create_booking(request(Destination::Mars, 3)).await.unwrap_err();
        assert!(matches!(err, BookingError::UpstreamUnavailable(_)));
        assert!(f.bookings.is_empty());
        assert_eq!(f.directory.launch_queries(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let f = fixture(
            InMemoryScheduleRepository::new().with_entry("LP1", Weekday::Mon, Destination::Mars),
            StaticLaunchDirectory::new(),
        );
        f.schedules.set_unavailable(true);

        let err = f.resolver.create_booking(request(Destination::Mars, 3)).await.unwrap_err();
        assert!(matches!(err, BookingError::Store(_)));
    }

    #[tokio::test]
    async fn test_concurrent_requests_both_insert() {
        let f = fixture(
            InMemoryScheduleRepository::new().with_entry("LP1", Weekday::Mon, Destination::Mars),
            StaticLaunchDirectory::new(),
        );

        let (a, b) = tokio::join!(
            f.resolver.create_booking(request(Destination::Mars, 3)),
            f.resolver.create_booking(request(Destination::Mars, 3)),
        );
        assert_ne!(a.unwrap().id, b.unwrap().id);
        assert_eq!(f.bookings.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_booking() {
        let f = fixture(
            InMemoryScheduleRepository::new().with_entry("LP1", Weekday::Mon, Destination::Mars),
            StaticLaunchDirectory::new(),
        );
        let booking = f.resolver.create_booking(request(Destination::Mars, 3)).await.unwrap();

        let err = f.resolver.delete_booking(booking.id + 100).await.unwrap_err();
        assert!(matches!(err, BookingError::NotFound(_)));
        assert_eq!(f.bookings.len(), 1);

        f.resolver.delete_booking(booking.id).await.unwrap();
        assert!(f.bookings.is_empty());
    }

    #[tokio::test]
    async fn test_empty_list_policy() {
        let f = fixture(InMemoryScheduleRepository::new(), StaticLaunchDirectory::new());
        assert!(f.resolver.list_bookings().await.unwrap().is_empty());

        let strict = f.resolver.with_empty_list_not_found(true);
        assert!(matches!(strict.list_bookings().await, Err(BookingError::NotFound(_))));
    }
}
