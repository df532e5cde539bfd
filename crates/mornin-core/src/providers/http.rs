//! Shared reqwest plumbing for the provider adapters.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::ProviderError;

const USER_AGENT: &str = concat!("mornin/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Build `base` + query parameters, mapping a bad base URL to `Malformed`.
pub(crate) fn endpoint(
    service: &'static str,
    base: &str,
    params: &[(&str, String)],
) -> Result<Url, ProviderError> {
    Url::parse_with_params(base, params).map_err(|e| ProviderError::Malformed {
        service,
        message: format!("invalid endpoint '{base}': {e}"),
    })
}

/// GET `url` and decode a JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    service: &'static str,
    url: Url,
) -> Result<T, ProviderError> {
    debug!(service, path = url.path(), "provider request");

    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|source| ProviderError::Request { service, source })?;

    if !resp.status().is_success() {
        return Err(ProviderError::Status {
            service,
            status: resp.status().as_u16(),
        });
    }

    let body = resp
        .text()
        .await
        .map_err(|source| ProviderError::Request { service, source })?;

    serde_json::from_str(&body).map_err(|e| ProviderError::Malformed {
        service,
        message: e.to_string(),
    })
}

/// Seconds to whole minutes, rounding half up.
pub(crate) fn round_minutes(seconds: u64) -> u32 {
    u32::try_from(seconds.saturating_add(30) / 60).unwrap_or(u32::MAX)
}
