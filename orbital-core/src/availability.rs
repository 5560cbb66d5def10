use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::dates::DayWindow;
use crate::directory::{GatewayError, LaunchDirectory};
use crate::{BookingError, BookingResult};

const ACTIVE_STATUS: &str = "active";
const UNKNOWN_STATUS: &str = "unknown";

/// Decides whether a resolved launchpad can take a booking on `date`.
#[async_trait]
pub trait AvailabilityCheck: Send + Sync {
    async fn ensure_available(&self, launchpad_id: &str, date: NaiveDate) -> BookingResult<()>;
}

/// Fails when the directory already has a launch on the pad that day.
pub struct LaunchWindowCheck {
    directory: Arc<dyn LaunchDirectory>,
}

impl LaunchWindowCheck {
    pub fn new(directory: Arc<dyn LaunchDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl AvailabilityCheck for LaunchWindowCheck {
    async fn ensure_available(&self, launchpad_id: &str, date: NaiveDate) -> BookingResult<()> {
        let window = DayWindow::for_date(date).ok_or_else(|| {
            BookingError::Validation(format!("launch_date {} is out of range", date))
        })?;
        let launches = self.directory.launches_at(launchpad_id, &window).await?;

        if !launches.is_empty() {
            debug!(launchpad_id, %date, conflicting = ?launches, "Launchpad occupied");
            return Err(BookingError::LaunchpadAlreadyReserved {
                launchpad_id: launchpad_id.to_string(),
                date,
            });
        }
        Ok(())
    }
}

/// Requires the pad to report `active` before running the launch-window check.
pub struct LaunchpadStatusCheck {
    directory: Arc<dyn LaunchDirectory>,
    window: LaunchWindowCheck,
}

impl LaunchpadStatusCheck {
    pub fn new(directory: Arc<dyn LaunchDirectory>) -> Self {
        Self {
            window: LaunchWindowCheck::new(directory.clone()),
            directory,
        }
    }
}

#[async_trait]
impl AvailabilityCheck for LaunchpadStatusCheck {
    async fn ensure_available(&self, launchpad_id: &str, date: NaiveDate) -> BookingResult<()> {
        let status = match self.directory.launchpad_status(launchpad_id).await {
            Ok(status) => status,
            // the directory is up but has never heard of this pad
            Err(GatewayError::UnexpectedStatus(404)) => UNKNOWN_STATUS.to_string(),
            Err(e) => return Err(e.into()),
        };
        if status != ACTIVE_STATUS {
            return Err(BookingError::LaunchpadInactive {
                launchpad_id: launchpad_id.to_string(),
                status,
            });
        }
        self.window.ensure_available(launchpad_id, date).await
    }
}

/// Config-selectable availability strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStrategy {
    #[default]
    LaunchWindow,
    LaunchpadStatus,
}

impl AvailabilityStrategy {
    pub fn build(self, directory: Arc<dyn LaunchDirectory>) -> Arc<dyn AvailabilityCheck> {
        match self {
            AvailabilityStrategy::LaunchWindow => Arc::new(LaunchWindowCheck::new(directory)),
            AvailabilityStrategy::LaunchpadStatus => Arc::new(LaunchpadStatusCheck::new(directory)),
        }
    }
}
