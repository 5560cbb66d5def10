use async_trait::async_trait;
use chrono::NaiveDate;
use orbital_core::{Booking, BookingRepository, Destination, NewBooking, StoreError};
use orbital_shared::Masked;
use sqlx::PgPool;

use crate::database::db_err;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    first_name: String,
    last_name: String,
    gender: String,
    birthday: NaiveDate,
    launchpad_id: String,
    destination_id: i16,
    launch_date: NaiveDate,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let destination = Destination::try_from(row.destination_id)
            .map_err(|e| StoreError::CorruptRow(format!("booking {}: {}", row.id, e)))?;

        Ok(Booking {
            id: row.id,
            first_name: Masked(row.first_name),
            last_name: Masked(row.last_name),
            gender: row.gender,
            birthday: row.birthday,
            launchpad_id: row.launchpad_id,
            destination,
            launch_date: row.launch_date,
        })
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert_booking(&self, booking: &NewBooking) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO bookings (first_name, last_name, gender, birthday, launchpad_id, destination_id, launch_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(booking.first_name.expose())
        .bind(booking.last_name.expose())
        .bind(&booking.gender)
        .bind(booking.birthday)
        .bind(&booking.launchpad_id)
        .bind(booking.destination.id() as i16)
        .bind(booking.launch_date)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, first_name, last_name, gender, birthday, launchpad_id, destination_id, launch_date
            FROM bookings
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn delete_booking(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(destination_id: i16) -> BookingRow {
        BookingRow {
            id: 11,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            gender: "female".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            launchpad_id: "5e9e4502f509094188566f88".to_string(),
            destination_id,
            launch_date: NaiveDate::from_ymd_opt(2049, 5, 3).unwrap(),
        }
    }

    #[test]
    fn test_row_decodes() {
        let booking = Booking::try_from(row(4)).unwrap();
        assert_eq!(booking.destination, Destination::AsteroidBelt);
        assert_eq!(booking.first_name.expose(), "Ada");
    }

    #[test]
    fn test_out_of_range_destination_is_corrupt() {
        match Booking::try_from(row(12)) {
            Err(StoreError::CorruptRow(msg)) => assert!(msg.contains("booking 11")),
            other => panic!("expected corrupt row, got {:?}", other.map(|b| b.id)),
        }
    }
}
