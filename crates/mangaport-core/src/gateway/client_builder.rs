use std::time::Duration;

/// Build the shared upstream HTTP client.
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(5)))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("mangaport/", env!("CARGO_PKG_VERSION")))
        .tcp_nodelay(true)
        .build()
}
