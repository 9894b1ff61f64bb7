//! `--health-check` mode for container probes.

use std::time::Duration;

/// GET `{base_url}/health`; any non-2xx answer or transport failure is an error.
pub async fn check(base_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()?;
    let resp = client.get(format!("{base_url}/health")).send().await?;
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(format!("/health answered with status {}", resp.status()).into())
    }
}
