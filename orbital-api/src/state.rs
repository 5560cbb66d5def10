use std::sync::Arc;

use orbital_core::{BookingRepository, BookingResolver, LaunchDirectory, ScheduleRepository};
use orbital_store::app_config::BookingConfig;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<BookingResolver>,
}

impl AppState {
    pub fn new(resolver: BookingResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// Wires the resolver from its collaborators and the `[booking]` config.
    pub fn from_parts(
        schedules: Arc<dyn ScheduleRepository>,
        bookings: Arc<dyn BookingRepository>,
        directory: Arc<dyn LaunchDirectory>,
        config: &BookingConfig,
    ) -> Self {
        let availability = config.availability_check.build(directory);
        let resolver = BookingResolver::new(schedules, bookings, availability)
            .with_empty_list_not_found(config.empty_list_not_found);
        Self::new(resolver)
    }
}
