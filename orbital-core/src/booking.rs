use chrono::{Datelike, NaiveDate, Weekday};
use orbital_shared::Masked;
use serde::Deserialize;

use crate::dates::{deserialize_calendar_date, DayWindow};
use crate::destination::Destination;
use crate::BookingError;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;

/// A committed reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub first_name: Masked<String>,
    pub last_name: Masked<String>,
    pub gender: String,
    pub birthday: NaiveDate,
    pub launchpad_id: String,
    pub destination: Destination,
    pub launch_date: NaiveDate,
}

/// Inbound booking request. The launchpad is derived, never supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub first_name: Masked<String>,
    pub last_name: Masked<String>,
    pub gender: String,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub birthday: NaiveDate,
    #[serde(rename = "destination_id")]
    pub destination: Destination,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub launch_date: NaiveDate,
}

impl BookingRequest {
    pub fn launch_weekday(&self) -> Weekday {
        self.launch_date.weekday()
    }

    pub fn validate(&self) -> Result<(), BookingError> {
        check_length("first_name", self.first_name.expose())?;
        check_length("last_name", self.last_name.expose())?;
        check_length("gender", &self.gender)?;

        if DayWindow::for_date(self.launch_date).is_none() {
            return Err(BookingError::Validation(format!(
                "launch_date {} is out of range",
                self.launch_date
            )));
        }
        if self.birthday > self.launch_date {
            return Err(BookingError::Validation(
                "birthday must not be after launch_date".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_length(field: &str, value: &str) -> Result<(), BookingError> {
    let len = value.trim().chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(BookingError::Validation(format!(
            "{} must be between {} and {} characters",
            field, NAME_MIN_CHARS, NAME_MAX_CHARS
        )));
    }
    Ok(())
}

/// Row about to be inserted; the store assigns the id. Names and gender are
/// stored trimmed, matching what `validate` measured.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub first_name: Masked<String>,
    pub last_name: Masked<String>,
    pub gender: String,
    pub birthday: NaiveDate,
    pub launchpad_id: String,
    pub destination: Destination,
    pub launch_date: NaiveDate,
}

impl NewBooking {
    pub fn from_request(request: BookingRequest, launchpad_id: String) -> Self {
        Self {
            first_name: Masked(request.first_name.expose().trim().to_string()),
            last_name: Masked(request.last_name.expose().trim().to_string()),
            gender: request.gender.trim().to_string(),
            birthday: request.birthday,
            launchpad_id,
            destination: request.destination,
            launch_date: request.launch_date,
        }
    }

    pub fn into_booking(self, id: i64) -> Booking {
        Booking {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            gender: self.gender,
            birthday: self.birthday,
            launchpad_id: self.launchpad_id,
            destination: self.destination,
            launch_date: self.launch_date,
        }
    }
}
