use serde::Deserialize;

/// Cross-origin resource sharing for the submit endpoint.
///
/// Empty `allowed_origins` disables the CORS layer entirely.
///
/// # Example
///
/// ```toml
/// [cors]
/// allowed_origins = ["https://forms.example.com"]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to post the form. `"*"` allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}
