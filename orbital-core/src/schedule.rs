use chrono::{DateTime, Utc, Weekday};

use crate::destination::Destination;

/// Canonical weekday ordering; index == stored `day_of_week`.
pub const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// "Launchpad L serves destination D on weekday W".
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub id: i64,
    pub launchpad_id: String,
    pub destination: Destination,
    pub day_of_week: Weekday,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduleEntry {
    pub fn day_index(&self) -> i16 {
        day_index(self.day_of_week)
    }
}

/// 0 = Sunday ... 6 = Saturday.
pub fn day_index(day: Weekday) -> i16 {
    day.num_days_from_sunday() as i16
}

pub fn weekday_from_index(index: i16) -> Option<Weekday> {
    usize::try_from(index).ok().and_then(|i| WEEK.get(i).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_indices_round_trip() {
        for (idx, day) in WEEK.iter().enumerate() {
            assert_eq!(day_index(*day) as usize, idx);
            assert_eq!(weekday_from_index(idx as i16), Some(*day));
        }
        assert_eq!(weekday_from_index(7), None);
        assert_eq!(weekday_from_index(-1), None);
    }
}
