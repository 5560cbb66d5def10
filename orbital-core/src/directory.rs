use async_trait::async_trait;

use crate::dates::DayWindow;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("launch directory request timed out")]
    Timeout,
    #[error("launch directory request failed: {0}")]
    Transport(String),
    #[error("launch directory returned status {0}")]
    UnexpectedStatus(u16),
    #[error("launch directory response could not be decoded: {0}")]
    Decode(String),
}

/// Third-party source of truth for launchpads and their launches.
#[async_trait]
pub trait LaunchDirectory: Send + Sync {
    /// Ids of launches already occupying `launchpad_id` inside `window`.
    async fn launches_at(
        &self,
        launchpad_id: &str,
        window: &DayWindow,
    ) -> Result<Vec<String>, GatewayError>;

    async fn active_launchpads(&self) -> Result<Vec<String>, GatewayError>;

    async fn launchpad_status(&self, launchpad_id: &str) -> Result<String, GatewayError>;
}
