pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod launch_directory;
pub mod schedule_repo;

pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
pub use launch_directory::SpaceXClient;
pub use schedule_repo::PgScheduleRepository;
