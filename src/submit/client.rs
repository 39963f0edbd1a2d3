use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;

use super::payload::BeatmapSubmission;

const USER_AGENT: &str = concat!("tapline/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECS: u64 = 10;

/// Client for the beatmap collection endpoint.
pub struct SubmitClient {
    client: Client,
    endpoint: String,
}

impl SubmitClient {
    pub fn new(endpoint: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    /// POST the submission and wait for the response status.
    /// The response body is not inspected; the endpoint returns nothing
    /// useful. There is no retry.
    pub fn submit(&self, submission: &BeatmapSubmission) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .context("Failed to submit beatmap")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("submission rejected: HTTP {status}");
        }
        log::info!(
            "submitted beatmap '{}' for track '{}' ({} beats)",
            submission.name,
            submission.track,
            submission.beat_count
        );
        Ok(())
    }
}
