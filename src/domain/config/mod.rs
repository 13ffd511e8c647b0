//! Configuration domain module

mod app_config;

pub use app_config::{AppConfig, CatalogConfig, GateConfig, DEFAULT_MAX_NAME_LEN};
