use crate::adapters::{foursquare, trec};
use crate::core::filter::CategoryBlacklist;
use crate::core::similarity::ResolvedVenue;
use crate::core::suggester::BundleSuggester;
use crate::domain::model::{CompressionSettings, Context, Dataset, InputPaths, SuggestionRun, Venue};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub struct SuggestionPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> SuggestionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    /// 依序載入場所 JSON；找不到的檔案以 debug 記錄後略過，解析失敗則記錄警告後略過
    async fn load_venues(&self, paths: &InputPaths, venue_ids: &[String]) -> Vec<Venue> {
        let mut venues = Vec::with_capacity(venue_ids.len());

        for venue_id in venue_ids {
            let data = match self.storage.read_file(&paths.venue_file(venue_id)).await {
                Ok(data) => data,
                Err(e) if e.is_not_found() => {
                    tracing::debug!("📭 No venue file for {}, skipped", venue_id);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("🔶 Failed to read venue {}: {}", venue_id, e);
                    continue;
                }
            };

            match foursquare::parse_venue(&data) {
                Ok(venue) => venues.push(venue),
                Err(e) => tracing::warn!("🔶 Venue {} is malformed: {}", venue_id, e),
            }
        }

        venues
    }

    /// 情境內的場所：依清單順序（去除重複），再套用分類黑名單（若有啟用）
    async fn load_local_venues(
        &self,
        paths: &InputPaths,
        context: &Context,
        blacklist: Option<&CategoryBlacklist>,
    ) -> Result<Vec<Venue>> {
        let data = self.storage.read_file(&paths.located_ids_file(context)).await?;

        let mut seen = HashSet::new();
        let venue_ids: Vec<String> = trec::parse_located_ids(&data)?
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let mut venues = self.load_venues(paths, &venue_ids).await;
        let loaded = venues.len();
        if let Some(blacklist) = blacklist {
            venues.retain(|venue| !blacklist.is_blacklisted_strict(venue));
        }

        tracing::debug!(
            "🏙️ Context {} ({}): {} listed, {} loaded, {} removed by category filter",
            context.id,
            context.name,
            venue_ids.len(),
            loaded,
            loaded - venues.len()
        );
        Ok(venues)
    }

    fn build_zip(&self, run: &SuggestionRun, filename: &str, compression: &CompressionSettings) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        zip.start_file::<_, ()>(filename, FileOptions::default())?;
        zip.write_all(run.render().as_bytes())?;

        if compression.include_metadata {
            let metadata = serde_json::json!({
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "run_file": filename,
                "lines": run.lines.len(),
                "pairs_processed": run.pairs_processed,
                "failed_units": run.failed_units,
                "params": self.config.suggestion_params(),
            });
            zip.start_file::<_, ()>("metadata.json", FileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&metadata)?.as_bytes())?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// 只保留指定的 id；不存在的 id 記錄警告，不會中斷整批處理
fn select_ids<T>(kind: &str, mut all: BTreeMap<String, T>, wanted: &[String]) -> BTreeMap<String, T> {
    let mut selected = BTreeMap::new();
    for id in wanted {
        match all.remove(id) {
            Some(item) => {
                selected.insert(id.clone(), item);
            }
            None if selected.contains_key(id) => {}
            None => tracing::warn!("🔶 Requested {} id {} not found, no output for it", kind, id),
        }
    }
    selected
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SuggestionPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        let paths = self.config.input_paths();

        tracing::debug!("🌳 Reading category tree from {}", paths.categories);
        let taxonomy = foursquare::load_taxonomy(&self.storage.read_file(&paths.categories).await?)?;

        let mapping =
            trec::parse_example_mapping(&self.storage.read_file(&paths.example_mapping).await?)?;
        let mut users = trec::parse_profiles(&self.storage.read_file(&paths.profiles).await?, &mapping)?;
        let mut contexts = trec::parse_contexts(&self.storage.read_file(&paths.contexts).await?)?;

        if let Some(ids) = self.config.profile_ids() {
            users = select_ids("profile", users, ids);
        }
        if let Some(ids) = self.config.context_ids() {
            contexts = select_ids("context", contexts, ids);
        }

        tracing::info!(
            "📥 Loaded {} categories, {} profiles, {} contexts",
            taxonomy.category_count(),
            users.len(),
            contexts.len()
        );

        Ok(Dataset {
            taxonomy,
            users,
            contexts,
        })
    }

    async fn transform(&self, data: Dataset) -> Result<SuggestionRun> {
        let paths = self.config.input_paths();
        let blacklist = self.config.category_blacklist();
        let suggester = BundleSuggester::new(&data.taxonomy, self.config.suggestion_params());
        let mut run = SuggestionRun::default();

        if data.users.is_empty() || data.contexts.is_empty() {
            tracing::warn!("🔶 Nothing to do: no profile or no context selected");
            return Ok(run);
        }

        let rated_ids: Vec<String> = data
            .users
            .values()
            .flat_map(|user| user.venue_ratings.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        // 評分場所只解析一次，供所有配對共用
        let rated_venues: HashMap<String, ResolvedVenue> = suggester
            .resolve_venues(self.load_venues(&paths, &rated_ids).await)
            .into_iter()
            .map(|venue| (venue.id().to_string(), venue))
            .collect();
        tracing::info!(
            "⭐ Loaded {} of {} rated venues",
            rated_venues.len(),
            rated_ids.len()
        );

        let total = data.users.len() * data.contexts.len();
        let mut done = 0usize;

        for context in data.contexts.values() {
            let local_venues = match self.load_local_venues(&paths, context, blacklist.as_ref()).await {
                Ok(venues) => suggester.resolve_venues(venues),
                Err(e) => {
                    tracing::warn!(
                        "❌ Context {} ({}) skipped: {}",
                        context.id,
                        context.name,
                        e.user_friendly_message()
                    );
                    run.failed_units += 1;
                    done += data.users.len();
                    continue;
                }
            };

            for user in data.users.values() {
                done += 1;
                tracing::debug!("[{}/{}] user {}, context {}", done, total, user.id, context.id);

                let lines = suggester.suggest(user, context, &local_venues, &rated_venues);
                run.lines.extend(lines);
                run.pairs_processed += 1;
            }
        }

        if run.failed_units > 0 {
            tracing::warn!("🔶 {} context(s) failed and were skipped", run.failed_units);
        }
        tracing::info!(
            "🧺 Produced {} lines for {} pairs",
            run.lines.len(),
            run.pairs_processed
        );
        Ok(run)
    }

    async fn load(&self, run: SuggestionRun) -> Result<String> {
        let settings = self.config.output_settings();
        let output_root = self.config.output_path();

        let output_path = match &settings.compression {
            Some(compression) => {
                let zip_data = self.build_zip(&run, &settings.filename, compression)?;
                let output_path = format!("{}/{}", output_root, compression.filename);

                tracing::debug!("📦 Writing ZIP file ({} bytes) to storage", zip_data.len());
                self.storage.write_file(&output_path, &zip_data).await?;
                output_path
            }
            None => {
                let output_path = format!("{}/{}", output_root, settings.filename);
                let rendered = run.render();

                if settings.append {
                    tracing::debug!("📝 Appending {} lines to {}", run.lines.len(), output_path);
                    self.storage.append_file(&output_path, rendered.as_bytes()).await?;
                } else {
                    tracing::debug!("📝 Writing {} lines to {}", run.lines.len(), output_path);
                    self.storage.write_file(&output_path, rendered.as_bytes()).await?;
                }
                output_path
            }
        };

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_ids_keeps_requested_and_skips_unknown() {
        let all: BTreeMap<String, u32> = [("151", 1), ("152", 2), ("153", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let wanted = vec!["153".to_string(), "999".to_string(), "151".to_string(), "151".to_string()];

        let selected = select_ids("context", all, &wanted);
        assert_eq!(selected.keys().collect::<Vec<_>>(), vec!["151", "153"]);
    }

    #[test]
    fn test_select_ids_with_empty_request() {
        let all: BTreeMap<String, u32> = [("700".to_string(), 1)].into_iter().collect();
        assert!(select_ids("profile", all, &[]).is_empty());
    }
}
