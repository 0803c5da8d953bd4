use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ml::TrainingStrategy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub model: ModelConfig,
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory holding the per-city raw CSV files.
    pub raw_dir: PathBuf,
    /// Location of the persisted combined dataset, shared between the
    /// training pipeline and the prediction service.
    pub combined_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub artifact_path: PathBuf,
    pub report_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    pub strategy: TrainingStrategy,
    /// Fraction of rows held out for evaluation.
    pub test_fraction: f64,
    pub seed: u64,
    pub n_trees: usize,
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    /// Tree-count increment per early-stopping round.
    pub early_stopping_step: usize,
    /// Rounds without held-out improvement before stopping.
    pub early_stopping_rounds: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("GWS__").split("__"));
        Ok(figment.extract()?)
    }
}
