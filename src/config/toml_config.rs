use crate::config::{validate_input_paths, validate_suggestion_params};
use crate::core::filter::CategoryBlacklist;
use crate::domain::model::{
    CompressionSettings, InputPaths, OutputSettings, ScoringWeights, SuggestionParams,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SuggestError};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub run: RunConfig,
    pub inputs: InputsConfig,
    #[serde(default)]
    pub bundles: BundlesConfig,
    pub scoring: Option<ScoringConfig>,
    pub filter: Option<FilterConfig>,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    pub categories: String,
    pub venues_dir: String,
    pub profiles: String,
    pub example_mapping: String,
    pub contexts: String,
    pub venues_per_context_dir: String,
    pub located_ids_suffix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundlesConfig {
    pub venues_per_bundle: Option<usize>,
    pub bundles_to_return: Option<usize>,
    pub bundles_to_create: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub popularity_weight: Option<f64>,
    pub coherence_weight: Option<f64>,
    pub appreciation_weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub profile_ids: Option<Vec<String>>,
    pub context_ids: Option<Vec<String>>,
    /// false 時不排除任何場所
    pub category_filter: Option<bool>,
    /// 取代內建的分類黑名單；空清單等同於關閉過濾
    pub category_blacklist: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub filename: Option<String>,
    pub append: Option<bool>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
    pub include_metadata: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    pub const DEFAULT_OUTPUT_FILENAME: &'static str = "suggestions.txt";

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SuggestError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SuggestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SuggestError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("run.name", &self.run.name)?;
        validate_input_paths(&self.input_paths())?;

        validate_path("output.path", &self.output.path)?;
        validate_path("output.filename", &self.output_filename())?;

        if let Some(compression) = self.compression() {
            validate_path("output.compression.filename", &compression.filename)?;
            if self.output.append.unwrap_or(false) {
                return Err(SuggestError::ConfigValidationError {
                    field: "output.append".to_string(),
                    message: "Appending is not supported for zip output".to_string(),
                });
            }
        }

        if let Some(filter) = &self.filter {
            for (field, ids) in [
                ("filter.profile_ids", &filter.profile_ids),
                ("filter.context_ids", &filter.context_ids),
            ] {
                for id in ids.iter().flatten() {
                    validate_non_empty_string(field, id)?;
                }
            }
        }

        validate_suggestion_params(&self.suggestion_params())
    }

    pub fn output_filename(&self) -> String {
        self.output
            .filename
            .clone()
            .unwrap_or_else(|| Self::DEFAULT_OUTPUT_FILENAME.to_string())
    }

    /// 啟用中的壓縮設定
    pub fn compression(&self) -> Option<&CompressionConfig> {
        self.output.compression.as_ref().filter(|c| c.enabled)
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_paths(&self) -> InputPaths {
        let inputs = &self.inputs;
        InputPaths {
            categories: inputs.categories.clone(),
            venues_dir: inputs.venues_dir.clone(),
            profiles: inputs.profiles.clone(),
            example_mapping: inputs.example_mapping.clone(),
            contexts: inputs.contexts.clone(),
            venues_per_context_dir: inputs.venues_per_context_dir.clone(),
            located_ids_suffix: inputs
                .located_ids_suffix
                .clone()
                .unwrap_or_else(|| InputPaths::DEFAULT_LOCATED_IDS_SUFFIX.to_string()),
        }
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_settings(&self) -> OutputSettings {
        OutputSettings {
            filename: self.output_filename(),
            append: self.output.append.unwrap_or(false),
            compression: self.compression().map(|c| CompressionSettings {
                filename: c.filename.clone(),
                include_metadata: c.include_metadata.unwrap_or(true),
            }),
        }
    }

    fn suggestion_params(&self) -> SuggestionParams {
        let bundles_to_return = self
            .bundles
            .bundles_to_return
            .unwrap_or(SuggestionParams::DEFAULT_BUNDLES_TO_RETURN);
        let defaults = ScoringWeights::default();
        let weights = match &self.scoring {
            Some(scoring) => ScoringWeights {
                popularity: scoring.popularity_weight.unwrap_or(defaults.popularity),
                coherence: scoring.coherence_weight.unwrap_or(defaults.coherence),
                appreciation: scoring.appreciation_weight.unwrap_or(defaults.appreciation),
            },
            None => defaults,
        };

        SuggestionParams {
            venues_per_bundle: self
                .bundles
                .venues_per_bundle
                .unwrap_or(SuggestionParams::DEFAULT_VENUES_PER_BUNDLE),
            bundles_to_create: self
                .bundles
                .bundles_to_create
                .unwrap_or_else(|| SuggestionParams::default_bundles_to_create(bundles_to_return)),
            bundles_to_return,
            weights,
        }
    }

    fn profile_ids(&self) -> Option<&[String]> {
        self.filter.as_ref().and_then(|f| f.profile_ids.as_deref())
    }

    fn context_ids(&self) -> Option<&[String]> {
        self.filter.as_ref().and_then(|f| f.context_ids.as_deref())
    }

    fn category_blacklist(&self) -> Option<CategoryBlacklist> {
        match &self.filter {
            Some(filter) if filter.category_filter == Some(false) => None,
            // 空的黑名單等同於關閉過濾
            Some(FilterConfig {
                category_blacklist: Some(ids),
                ..
            }) if ids.is_empty() => None,
            Some(FilterConfig {
                category_blacklist: Some(ids),
                ..
            }) => Some(CategoryBlacklist::new(ids.iter().cloned())),
            _ => Some(CategoryBlacklist::default()),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
