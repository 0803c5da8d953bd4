pub mod api;
pub mod config;
pub mod dataset;
pub mod ml;
pub mod service;
pub mod telemetry;
