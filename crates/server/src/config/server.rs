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
    /// Path the form posts to.
    #[serde(default = "default_submit_path")]
    pub submit_path: String,
    /// Graceful shutdown timeout in seconds.
    ///
    /// In-flight submissions get this long to finish their Telegram calls
    /// once a shutdown signal arrives.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            submit_path: default_submit_path(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_submit_path() -> String {
    "/api/submit".to_owned()
}

fn default_shutdown_timeout() -> u64 {
    30
}
