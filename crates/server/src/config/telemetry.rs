use std::fmt;

use serde::Deserialize;

/// OTLP transport used to export spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtlpProtocol {
    /// gRPC via tonic, collector port 4317.
    #[default]
    Grpc,
    /// HTTP/protobuf, collector port 4318.
    Http,
}

impl OtlpProtocol {
    /// Collector address used when `endpoint` is not configured.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Self::Grpc => "http://localhost:4317",
            Self::Http => "http://localhost:4318/v1/traces",
        }
    }
}

impl fmt::Display for OtlpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Grpc => "grpc",
            Self::Http => "http",
        })
    }
}

/// Span export for the relay. Off by default; plain log output is always on.
///
/// ```toml
/// [telemetry]
/// enabled = true
/// protocol = "http"
/// sample_ratio = 0.2
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub protocol: OtlpProtocol,
    /// Collector address. Defaults to the local collector port for `protocol`.
    pub endpoint: Option<String>,
    /// Reported as `service.name`.
    pub service_name: String,
    /// Fraction of submissions traced, clamped to `0.0..=1.0`.
    pub sample_ratio: f64,
    /// Exporter timeout in seconds.
    pub timeout_seconds: u64,
}

impl TelemetryConfig {
    /// The configured collector address, or the protocol default.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.protocol.default_endpoint())
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            protocol: OtlpProtocol::default(),
            endpoint: None,
            service_name: "formrelay".to_owned(),
            sample_ratio: 1.0,
            timeout_seconds: 10,
        }
    }
}
