use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Url;

/// Probes the grader health endpoint, exiting non-zero when it is unhealthy.
fn main() -> Result<()> {
    let url = env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:8888/health".to_string());
    let url = Url::parse(&url).with_context(|| format!("Invalid URL {url}"))?;

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let response = client
        .get(url.clone())
        .send()
        .with_context(|| format!("Request to {url} failed"))?;
    if !response.status().is_success() {
        bail!("{url} responded with {}", response.status())
    }

    Ok(())
}
