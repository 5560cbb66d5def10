pub mod availability;
pub mod booking;
pub mod dates;
pub mod destination;
pub mod directory;
pub mod generator;
pub mod memory;
pub mod repository;
pub mod resolver;
pub mod schedule;

use chrono::{NaiveDate, Weekday};

pub use availability::{AvailabilityCheck, AvailabilityStrategy, LaunchWindowCheck, LaunchpadStatusCheck};
pub use booking::{Booking, BookingRequest, NewBooking};
pub use dates::DayWindow;
pub use destination::{Destination, InvalidDestination};
pub use directory::{GatewayError, LaunchDirectory};
pub use generator::{generate_schedule, ScheduleJob, ScheduleJobError, ScheduleReport};
pub use repository::{BookingRepository, ScheduleRepository, StoreError};
pub use resolver::BookingResolver;
pub use schedule::{ScheduleEntry, WEEK};

/// Every way a booking operation can fail. Each variant maps to exactly one
/// outward signal at the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("No launchpad is scheduled for {destination} on {weekday:?}")]
    NoScheduleForDestination {
        destination: Destination,
        weekday: Weekday,
    },
    #[error("Launchpad {launchpad_id} has already been reserved on {date}")]
    LaunchpadAlreadyReserved {
        launchpad_id: String,
        date: NaiveDate,
    },
    #[error("Launchpad {launchpad_id} is not active (status: {status})")]
    LaunchpadInactive {
        launchpad_id: String,
        status: String,
    },
    #[error("Launch directory unavailable: {0}")]
    UpstreamUnavailable(#[from] GatewayError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    NotFound(String),
}

pub type BookingResult<T> = Result<T, BookingError>;
