use async_trait::async_trait;
use orbital_core::{DayWindow, GatewayError, LaunchDirectory};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

/// SpaceX API v4 client (`https://api.spacexdata.com/v4/`).
#[derive(Clone)]
pub struct SpaceXClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    docs: Vec<IdDoc>,
}

#[derive(Debug, Deserialize)]
struct IdDoc {
    id: String,
}

#[derive(Debug, Deserialize)]
struct LaunchpadDoc {
    status: String,
}

/// Launches on `launchpad_id` with `date_utc` in `[window.start, window.end)`.
pub fn launches_query(launchpad_id: &str, window: &DayWindow) -> Value {
    let (gte, lt) = window.rfc3339_bounds();
    json!({
        "query": {
            "launchpad": launchpad_id,
            "date_utc": { "$gte": gte, "$lt": lt }
        },
        "options": { "select": { "id": 1 }, "pagination": false }
    })
}

pub fn active_launchpads_query() -> Value {
    json!({
        "query": { "status": "active" },
        "options": { "select": { "id": 1 }, "pagination": false }
    })
}

fn map_transport(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_decode() {
        GatewayError::Decode(err.to_string())
    } else {
        GatewayError::Transport(err.to_string())
    }
}

impl SpaceXClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(Self { http, base_url })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            error!("Launch directory {} answered {}", url, status);
            return Err(GatewayError::UnexpectedStatus(status.as_u16()));
        }
        response.json::<T>().await.map_err(map_transport)
    }

    async fn query_ids(&self, path: &str, body: &Value) -> Result<Vec<String>, GatewayError> {
        let url = self.url(path);
        debug!("POST {} {}", url, body);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_transport)?;

        let result: QueryResponse = self.decode(&url, response).await?;
        Ok(result.docs.into_iter().map(|d| d.id).collect())
    }
}

#[async_trait]
impl LaunchDirectory for SpaceXClient {
    async fn launches_at(
        &self,
        launchpad_id: &str,
        window: &DayWindow,
    ) -> Result<Vec<String>, GatewayError> {
        self.query_ids("launches/query", &launches_query(launchpad_id, window))
            .await
    }

    async fn active_launchpads(&self) -> Result<Vec<String>, GatewayError> {
        self.query_ids("launchpads/query", &active_launchpads_query())
            .await
    }

    async fn launchpad_status(&self, launchpad_id: &str) -> Result<String, GatewayError> {
        let url = self.url(&format!("launchpads/{}", launchpad_id));
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await.map_err(map_transport)?;
        let doc: LaunchpadDoc = self.decode(&url, response).await?;
        Ok(doc.status)
    }
}
