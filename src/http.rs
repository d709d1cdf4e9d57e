//! Shared HTTP plumbing for the upstream feeds

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;

use crate::error::DroneWeatherError;
use crate::Result;

const USER_AGENT: &str = concat!("DroneWeather/", env!("CARGO_PKG_VERSION"));

/// Build a client that retries transient failures with exponential backoff.
pub fn build_client(timeout: Duration, max_retries: u32) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| DroneWeatherError::config(format!("Failed to create HTTP client: {e}")))?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// GET `url` and return the body, mapping failures to errors for `feed`.
pub async fn get_text(client: &ClientWithMiddleware, feed: &str, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DroneWeatherError::fetch(feed, format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match status.as_u16() {
            429 => DroneWeatherError::fetch(feed, "rate limit exceeded"),
            _ => DroneWeatherError::fetch(feed, format!("HTTP {status}: {body}")),
        });
    }

    response
        .text()
        .await
        .map_err(|e| DroneWeatherError::fetch(feed, format!("failed to read body: {e}")))
}
