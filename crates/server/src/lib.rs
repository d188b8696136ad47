pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod relay;
pub mod telemetry;
