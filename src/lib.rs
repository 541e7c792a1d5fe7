pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::storage::LocalStorage;
pub use config::{toml_config::TomlConfig, DeckConfig};
pub use core::{
    etl::{EtlEngine, RunSummary},
    pipeline::DeckPipeline,
};
pub use utils::error::{DeckError, Result};
