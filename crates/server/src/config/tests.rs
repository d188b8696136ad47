use super::*;

#[test]
fn empty_file_yields_defaults() {
    let config: FormRelayConfig = toml::from_str("").unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.submit_path, "/api/submit");
    assert_eq!(config.server.shutdown_timeout_seconds, 30);
    assert_eq!(config.telegram.api_base_url, "https://api.telegram.org");
    assert_eq!(config.telegram.timeout_seconds, 30);
    assert_eq!(config.telegram.min_upload_bytes_per_sec, 64 * 1024);
    assert_eq!(config.limits, FormLimits::default());
    assert!(config.cors.allowed_origins.is_empty());
    assert!(!config.telemetry.enabled);
}

#[test]
fn full_config_parses() {
    let toml = r#"
        [server]
        host = "0.0.0.0"
        port = 3000
        submit_path = "/submit"

        [telegram]
        api_base_url = "http://localhost:8081"
        timeout_seconds = 5
        min_upload_bytes_per_sec = 1048576

        [limits]
        max_file_size_bytes = 10485760
        allow_empty_files = true

        [cors]
        allowed_origins = ["https://forms.example.com"]

        [telemetry]
        enabled = true
        protocol = "http"
    "#;

    let config: FormRelayConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.submit_path, "/submit");
    assert_eq!(config.server.shutdown_timeout_seconds, 30);
    assert_eq!(config.telegram.api_base_url, "http://localhost:8081");
    assert_eq!(config.telegram.timeout_seconds, 5);
    assert_eq!(config.telegram.min_upload_bytes_per_sec, 1024 * 1024);
    assert_eq!(config.limits.max_file_size_bytes, 10_485_760);
    assert!(config.limits.allow_empty_files);
    assert_eq!(config.limits.max_fields, 1000);
    assert_eq!(config.cors.allowed_origins, ["https://forms.example.com"]);
    assert!(config.telemetry.enabled);
    assert_eq!(config.telemetry.protocol, OtlpProtocol::Http);
    assert_eq!(config.telemetry.service_name, "formrelay");
    assert_eq!(config.telemetry.endpoint(), "http://localhost:4318/v1/traces");
}

#[test]
fn telemetry_endpoint_follows_protocol() {
    let config = TelemetryConfig::default();
    assert_eq!(config.protocol, OtlpProtocol::Grpc);
    assert_eq!(config.endpoint(), "http://localhost:4317");

    let config: TelemetryConfig = toml::from_str(
        r#"
        enabled = true
        sample_ratio = 0.5
        endpoint = "http://otel-collector:4317"
    "#,
    )
    .unwrap();
    assert!((config.sample_ratio - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.endpoint(), "http://otel-collector:4317");
}

#[test]
fn unknown_telemetry_protocol_is_rejected() {
    let result = toml::from_str::<TelemetryConfig>(r#"protocol = "carrier-pigeon""#);
    assert!(result.is_err());
}

#[test]
fn missing_file_loads_defaults() {
    let config =
        FormRelayConfig::load(Path::new("/nonexistent/formrelay/formrelay.toml")).unwrap();
    assert_eq!(config.server.port, 8080);
}

#[test]
fn invalid_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("formrelay.toml");
    std::fs::write(&path, "[server]\nport = \"not a number\"\n").unwrap();

    let err = FormRelayConfig::load(&path).unwrap_err();
    assert!(matches!(err, ServerError::Config(_)));
}
