use serde::Deserialize;

/// HTTP server bind configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Graceful shutdown timeout in seconds.
    ///
    /// Maximum time to wait for the stores to close after the listener
    /// stops accepting requests.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
    /// External URL that video references are built from
    /// (e.g. `https://emogo.example.com`).
    ///
    /// If not set, defaults to `http://localhost:{port}`.
    pub external_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
            external_url: None,
        }
    }
}

impl ServerConfig {
    /// The base URL for video references, given the port actually bound.
    pub fn public_base_url(&self, port: u16) -> String {
        self.external_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{port}"))
    }
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8000
}

/// Dashboard configuration.
#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    /// Whether to serve the dashboard.
    #[serde(default = "default_dashboard_enabled")]
    pub enabled: bool,
    /// Path to the directory containing the built dashboard static files.
    /// Defaults to `"dashboard/dist"`.
    #[serde(default = "default_dashboard_dist")]
    pub dist_path: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: default_dashboard_enabled(),
            dist_path: default_dashboard_dist(),
        }
    }
}

fn default_dashboard_enabled() -> bool {
    true
}

fn default_dashboard_dist() -> String {
    "dashboard/dist".to_owned()
}
