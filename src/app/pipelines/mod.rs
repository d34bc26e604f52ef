pub mod suggestion_pipeline;

pub use suggestion_pipeline::SuggestionPipeline;
