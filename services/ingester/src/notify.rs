//! Best-effort cache-invalidation notification.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// POST `<endpoint>/clear_cache?driver_path=<store>` once the batch
/// is done. Any transport or status error is reported as a warning
/// and never alters the ingestion outcome.
pub async fn clear_cache(endpoint: &Url, store_path: &Path) {
    let client = match reqwest::Client::builder().timeout(NOTIFY_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Failed to build HTTP client for cache invalidation");
            return;
        }
    };

    let url = format!("{}/clear_cache", endpoint.as_str().trim_end_matches('/'));
    let result = client
        .post(&url)
        .query(&[("driver_path", store_path.to_string_lossy().as_ref())])
        .send()
        .await
        .and_then(|response| response.error_for_status());

    match result {
        Ok(_) => debug!(endpoint = %url, "Cleared remote cache"),
        Err(e) => warn!(error = %e, "Failed to clear cache"),
    }
}
