pub mod cli;
pub mod toml_config;

use crate::core::filter::CategoryBlacklist;
use crate::domain::model::{
    CompressionSettings, InputPaths, OutputSettings, ScoringWeights, SuggestionParams,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SuggestError};
use crate::utils::validation::{validate_path, validate_positive_number, validate_range, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "composite-suggester")]
#[command(about = "Suggest bundles of venues for TREC contextual suggestion profiles")]
pub struct CliConfig {
    #[arg(long, default_value = "data/categories.json")]
    pub categories: String,

    #[arg(long, default_value = "data/venues")]
    pub venues_dir: String,

    #[arg(long, default_value = "data/profiles.csv")]
    pub profiles: String,

    #[arg(long, default_value = "data/examples2foursquare.csv")]
    pub example_mapping: String,

    #[arg(long, default_value = "data/contexts.csv")]
    pub contexts: String,

    #[arg(long, default_value = "data/venues_per_context")]
    pub venues_per_context_dir: String,

    #[arg(long, default_value = InputPaths::DEFAULT_LOCATED_IDS_SUFFIX)]
    pub located_ids_suffix: String,

    #[arg(long, default_value_t = SuggestionParams::DEFAULT_VENUES_PER_BUNDLE)]
    pub venues_per_bundle: usize,

    #[arg(long, default_value_t = SuggestionParams::DEFAULT_BUNDLES_TO_RETURN)]
    pub bundles_to_return: usize,

    #[arg(long, help = "Candidate bundles to build (default: 10 x bundles-to-return)")]
    pub bundles_to_create: Option<usize>,

    #[arg(long, default_value_t = 1.0)]
    pub popularity_weight: f64,

    #[arg(long, default_value_t = 1.0)]
    pub coherence_weight: f64,

    #[arg(long, default_value_t = 10.0)]
    pub appreciation_weight: f64,

    #[arg(long, value_delimiter = ',', help = "Only process these profile ids")]
    pub profile_ids: Option<Vec<String>>,

    #[arg(long, value_delimiter = ',', help = "Only process these context ids")]
    pub context_ids: Option<Vec<String>>,

    #[arg(long, help = "Keep venues whose categories are all non-touristic")]
    pub no_category_filter: bool,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "suggestions.txt")]
    pub output_filename: String,

    #[arg(long, help = "Append to the run file instead of overwriting it")]
    pub append: bool,

    #[arg(long, help = "Write the run file into this zip archive")]
    pub zip: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_paths(&self) -> InputPaths {
        InputPaths {
            categories: self.categories.clone(),
            venues_dir: self.venues_dir.clone(),
            profiles: self.profiles.clone(),
            example_mapping: self.example_mapping.clone(),
            contexts: self.contexts.clone(),
            venues_per_context_dir: self.venues_per_context_dir.clone(),
            located_ids_suffix: self.located_ids_suffix.clone(),
        }
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_settings(&self) -> OutputSettings {
        OutputSettings {
            filename: self.output_filename.clone(),
            append: self.append,
            compression: self.zip.as_ref().map(|filename| CompressionSettings {
                filename: filename.clone(),
                include_metadata: true,
            }),
        }
    }

    fn suggestion_params(&self) -> SuggestionParams {
        SuggestionParams {
            venues_per_bundle: self.venues_per_bundle,
            bundles_to_create: self
                .bundles_to_create
                .unwrap_or_else(|| SuggestionParams::default_bundles_to_create(self.bundles_to_return)),
            bundles_to_return: self.bundles_to_return,
            weights: ScoringWeights {
                popularity: self.popularity_weight,
                coherence: self.coherence_weight,
                appreciation: self.appreciation_weight,
            },
        }
    }

    fn profile_ids(&self) -> Option<&[String]> {
        self.profile_ids.as_deref()
    }

    fn context_ids(&self) -> Option<&[String]> {
        self.context_ids.as_deref()
    }

    fn category_blacklist(&self) -> Option<CategoryBlacklist> {
        (!self.no_category_filter).then(CategoryBlacklist::default)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_input_paths(&self.input_paths())?;
        validate_path("output_path", &self.output_path)?;
        validate_path("output_filename", &self.output_filename)?;
        if let Some(zip) = &self.zip {
            validate_path("zip", zip)?;
        }
        if self.append && self.zip.is_some() {
            return Err(SuggestError::ConfigValidationError {
                field: "append".to_string(),
                message: "Appending is not supported for zip output".to_string(),
            });
        }
        validate_suggestion_params(&self.suggestion_params())
    }
}

pub(crate) fn validate_input_paths(paths: &InputPaths) -> Result<()> {
    validate_path("inputs.categories", &paths.categories)?;
    validate_path("inputs.venues_dir", &paths.venues_dir)?;
    validate_path("inputs.profiles", &paths.profiles)?;
    validate_path("inputs.example_mapping", &paths.example_mapping)?;
    validate_path("inputs.contexts", &paths.contexts)?;
    validate_path("inputs.venues_per_context_dir", &paths.venues_per_context_dir)?;
    Ok(())
}

/// bundle 數量與權重的共用檢查
pub(crate) fn validate_suggestion_params(params: &SuggestionParams) -> Result<()> {
    validate_positive_number("bundles.venues_per_bundle", params.venues_per_bundle, 1)?;
    validate_positive_number("bundles.bundles_to_return", params.bundles_to_return, 1)?;
    validate_positive_number(
        "bundles.bundles_to_create",
        params.bundles_to_create,
        params.bundles_to_return,
    )?;

    let weights = params.weights;
    validate_range("scoring.popularity_weight", weights.popularity, 0.0, f64::MAX)?;
    validate_range("scoring.coherence_weight", weights.coherence, 0.0, f64::MAX)?;
    validate_range("scoring.appreciation_weight", weights.appreciation, 0.0, f64::MAX)?;
    if weights.popularity + weights.coherence + weights.appreciation <= 0.0 {
        return Err(SuggestError::ConfigValidationError {
            field: "scoring".to_string(),
            message: "At least one scoring weight must be positive".to_string(),
        });
    }

    Ok(())
}
