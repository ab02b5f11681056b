//! HTTP client for communicating with uniattend-server

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use uniattend_core::AttendanceStore;
use uniattend_core::protocol::{
    ATTENDANCE_PATH, ErrorResponse, FieldUpdate, SuccessResponse, UPDATE_PATH,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The server side of the sync protocol, as seen by a client.
pub trait AttendanceRemote: Send + Sync + 'static {
    /// GET the full store.
    fn fetch_all(&self) -> impl Future<Output = Result<AttendanceStore>> + Send;

    /// Replace the full store.
    fn replace_all(&self, store: &AttendanceStore) -> impl Future<Output = Result<()>> + Send;

    /// Merge a single field.
    fn send_update(&self, update: &FieldUpdate) -> impl Future<Output = Result<()>> + Send;
}

/// HTTP client for uniattend-server
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into an error carrying the server's message
async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    match resp.json::<ErrorResponse>().await {
        Ok(err) => anyhow::bail!("{}", err.error),
        Err(_) => anyhow::bail!("Server responded with {}", status),
    }
}

impl AttendanceRemote for Client {
    /// GET /api/attendance
    async fn fetch_all(&self) -> Result<AttendanceStore> {
        let resp = self
            .http
            .get(self.url(ATTENDANCE_PATH))
            .send()
            .await
            .context("Failed to connect to server")?;

        Ok(check(resp).await?.json().await?)
    }

    /// POST /api/attendance
    async fn replace_all(&self, store: &AttendanceStore) -> Result<()> {
        let resp = self
            .http
            .post(self.url(ATTENDANCE_PATH))
            .json(store)
            .send()
            .await
            .context("Failed to connect to server")?;

        let _: SuccessResponse = check(resp).await?.json().await?;
        Ok(())
    }

    /// POST /api/attendance/update
    async fn send_update(&self, update: &FieldUpdate) -> Result<()> {
        let resp = self
            .http
            .post(self.url(UPDATE_PATH))
            .json(update)
            .send()
            .await
            .context("Failed to connect to server")?;

        let _: SuccessResponse = check(resp).await?.json().await?;
        Ok(())
    }
}
