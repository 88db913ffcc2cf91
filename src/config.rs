//! Endpoint configuration for the ClickHouse backend and the proxy itself
//!
//! Both structs are filled in from CLI flags; the defaults match the flag
//! defaults so that `chspeedscope` with no arguments proxies a local
//! ClickHouse on its HTTP port.

/// Location of the ClickHouse HTTP interface
#[derive(Debug, Clone)]
pub struct ClickHouseConfig {
    pub host: String,
    pub port: u16,
}

impl ClickHouseConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Base URL of the ClickHouse HTTP interface
    pub fn url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self::new("localhost", 8123)
    }
}

/// Address the proxy serves on, as seen both by the bind call and by the
/// browser fetching the profile
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Address passed to the TCP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL of the profile endpoint, without the query string
    pub fn endpoint_url(&self) -> String {
        format!("http://{}:{}/query", self.host, self.port)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new("localhost", 8080)
    }
}
