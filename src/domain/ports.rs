use crate::core::filter::CategoryBlacklist;
use crate::domain::model::{Dataset, InputPaths, OutputSettings, SuggestionParams, SuggestionRun};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_paths(&self) -> InputPaths;
    fn output_path(&self) -> &str;
    fn output_settings(&self) -> OutputSettings;
    fn suggestion_params(&self) -> SuggestionParams;
    /// None 表示處理全部 profile
    fn profile_ids(&self) -> Option<&[String]>;
    /// None 表示處理全部情境
    fn context_ids(&self) -> Option<&[String]>;
    /// None 表示關閉分類過濾，所有場所都保留
    fn category_blacklist(&self) -> Option<CategoryBlacklist>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<SuggestionRun>;
    async fn load(&self, run: SuggestionRun) -> Result<String>;
}
