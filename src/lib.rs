pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use app::pipelines::SuggestionPipeline;
pub use crate::core::{engine::SuggestionEngine, suggester::BundleSuggester, taxonomy::Taxonomy};
pub use utils::error::{Result, SuggestError};
