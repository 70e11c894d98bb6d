use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Default request body limit; large enough for typical report PDFs.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 256 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Upstream analysis backend. Not checked at startup; a missing value
    /// fails each relayed request instead.
    pub api_url: Option<String>,
    /// Where the page posts submissions. Defaults to this server's relay.
    pub analysis_endpoint: Option<String>,
    /// Upstream request timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub max_payload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_url: None,
            analysis_endpoint: None,
            timeout_secs: None,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl AppConfig {
    pub fn analysis_endpoint(&self) -> String {
        match &self.analysis_endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("http://{}:{}/api/proxy", self.local_authority(), self.port),
        }
    }

    /// Host part of a URL reaching this server. Wildcard binds map to
    /// loopback and IPv6 literals are bracketed.
    fn local_authority(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V4(ip)) if ip.is_unspecified() => Ipv4Addr::LOCALHOST.to_string(),
            Ok(IpAddr::V6(ip)) if ip.is_unspecified() => format!("[{}]", Ipv6Addr::LOCALHOST),
            Ok(IpAddr::V6(ip)) => format!("[{}]", ip),
            _ => self.host.clone(),
        }
    }

    pub fn build_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        builder.build()
    }
}
