pub mod bundle;
pub mod bundler;
pub mod engine;
pub mod explanation;
pub mod filter;
pub mod scoring;
pub mod selector;
pub mod similarity;
pub mod suggester;
pub mod taxonomy;

pub use crate::domain::model::{Dataset, SuggestionLine, SuggestionRun};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
