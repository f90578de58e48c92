use reqwest::Client;
use std::time::Duration;

/// Browser-like agent; the chart API rejects requests without one.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the shared outbound HTTP client.
    ///
    /// Requests are issued once: a transport error or bad status surfaces to
    /// the caller unchanged.
    pub fn create_client(timeout: Duration) -> Client {
        Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}
