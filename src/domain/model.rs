use crate::core::taxonomy::Taxonomy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 原始評分的上限（-1..=4），正規化時除以此值
pub const RATING_SCALE_MAX: f64 = 4.0;

/// 將原始評分線性縮放到 [-0.25, 1.0]
pub fn normalize_rating(raw: i32) -> f64 {
    raw as f64 / RATING_SCALE_MAX
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryIcon {
    pub prefix: String,
    pub suffix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// 場所；相等性只看 id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    /// category id -> category name
    pub categories: BTreeMap<String, String>,
    pub likes: u64,
    pub location: Option<GeoPoint>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl Venue {
    pub fn new(id: impl Into<String>, likes: u64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            categories: BTreeMap::new(),
            likes,
            location: None,
            city: None,
            country: None,
        }
    }

    pub fn with_category(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.categories.insert(id.into(), name.into());
        self
    }
}

impl PartialEq for Venue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Venue {}

/// 使用者：已評分場所 id -> 正規化評分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub venue_ratings: BTreeMap<String, f64>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            venue_ratings: BTreeMap::new(),
        }
    }

    pub fn rate(&mut self, venue_id: impl Into<String>, rating: f64) {
        self.venue_ratings.insert(venue_id.into(), rating);
    }
}

/// 情境（城市）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// 綜合分數中三項指標的權重
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub popularity: f64,
    pub coherence: f64,
    pub appreciation: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            popularity: 1.0,
            coherence: 1.0,
            appreciation: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuggestionParams {
    pub venues_per_bundle: usize,
    pub bundles_to_create: usize,
    pub bundles_to_return: usize,
    pub weights: ScoringWeights,
}

impl SuggestionParams {
    pub const DEFAULT_VENUES_PER_BUNDLE: usize = 5;
    pub const DEFAULT_BUNDLES_TO_RETURN: usize = 10;

    /// 未指定時，建立的候選數為回傳數的 10 倍
    pub fn default_bundles_to_create(bundles_to_return: usize) -> usize {
        bundles_to_return.saturating_mul(10)
    }
}

impl Default for SuggestionParams {
    fn default() -> Self {
        Self {
            venues_per_bundle: Self::DEFAULT_VENUES_PER_BUNDLE,
            bundles_to_create: Self::default_bundles_to_create(Self::DEFAULT_BUNDLES_TO_RETURN),
            bundles_to_return: Self::DEFAULT_BUNDLES_TO_RETURN,
            weights: ScoringWeights::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputPaths {
    pub categories: String,
    pub venues_dir: String,
    pub profiles: String,
    pub example_mapping: String,
    pub contexts: String,
    pub venues_per_context_dir: String,
    pub located_ids_suffix: String,
}

impl InputPaths {
    pub const DEFAULT_LOCATED_IDS_SUFFIX: &'static str = ".ids.filtered";

    pub fn located_ids_file(&self, context: &Context) -> String {
        format!(
            "{}/{}{}",
            self.venues_per_context_dir, context.name, self.located_ids_suffix
        )
    }

    pub fn venue_file(&self, venue_id: &str) -> String {
        format!("{}/{}", self.venues_dir, venue_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionSettings {
    pub filename: String,
    pub include_metadata: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub filename: String,
    pub append: bool,
    pub compression: Option<CompressionSettings>,
}

/// 輸出檔的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionLine {
    pub user_id: String,
    pub context_id: String,
    pub bundle_rank: usize,
    pub venue_rank: usize,
    pub venue_id: String,
    pub bundle_score: f64,
    pub similar_venue_ids: Vec<String>,
}

/// 分數以 `{:?}` 輸出，整數值也保留小數點（`1.0`、`0.0`）
impl fmt::Display for SuggestionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{} {}.{} {} {:?}",
            self.user_id,
            self.context_id,
            self.bundle_rank,
            self.venue_rank,
            self.venue_id,
            self.bundle_score
        )?;
        if !self.similar_venue_ids.is_empty() {
            write!(f, " {}", self.similar_venue_ids.join("#"))?;
        }
        Ok(())
    }
}

/// extract 階段的產物
#[derive(Debug)]
pub struct Dataset {
    pub taxonomy: Taxonomy,
    pub users: BTreeMap<String, User>,
    pub contexts: BTreeMap<String, Context>,
}

/// transform 階段的產物
#[derive(Debug, Clone, Default)]
pub struct SuggestionRun {
    pub lines: Vec<SuggestionLine>,
    pub pairs_processed: usize,
    pub failed_units: usize,
}

impl SuggestionRun {
    pub fn render(&self) -> String {
        let mut output = String::new();
        for line in &self.lines {
            output.push_str(&line.to_string());
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(similar: &[&str]) -> SuggestionLine {
        SuggestionLine {
            user_id: "700".to_string(),
            context_id: "151".to_string(),
            bundle_rank: 2,
            venue_rank: 3,
            venue_id: "4ad08b28f964a52064d820e3".to_string(),
            bundle_score: 0.5,
            similar_venue_ids: similar.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_line_without_similar_venues_has_no_trailing_space() {
        assert_eq!(line(&[]).to_string(), "700_151 2.3 4ad08b28f964a52064d820e3 0.5");
    }

    #[test]
    fn test_line_joins_similar_venues_with_hash() {
        assert_eq!(
            line(&["a", "b", "c"]).to_string(),
            "700_151 2.3 4ad08b28f964a52064d820e3 0.5 a#b#c"
        );
    }

    #[test]
    fn test_whole_scores_keep_decimal_point() {
        let mut perfect = line(&["a"]);
        perfect.bundle_score = 1.0;
        assert_eq!(perfect.to_string(), "700_151 2.3 4ad08b28f964a52064d820e3 1.0 a");

        let mut zero = line(&[]);
        zero.bundle_score = 0.0;
        assert_eq!(zero.to_string(), "700_151 2.3 4ad08b28f964a52064d820e3 0.0");
    }

    #[test]
    fn test_normalize_rating() {
        assert_eq!(normalize_rating(4), 1.0);
        assert_eq!(normalize_rating(3), 0.75);
        assert_eq!(normalize_rating(0), 0.0);
        assert_eq!(normalize_rating(-1), -0.25);
    }

    #[test]
    fn test_venue_equality_is_by_id() {
        let a = Venue::new("v1", 3).with_category("c1", "Museum");
        let b = Venue::new("v1", 99);
        assert_eq!(a, b);
        assert_ne!(a, Venue::new("v2", 3));
    }

    #[test]
    fn test_default_params() {
        let params = SuggestionParams::default();
        assert_eq!(params.venues_per_bundle, 5);
        assert_eq!(params.bundles_to_return, 10);
        assert_eq!(params.bundles_to_create, 100);
        assert_eq!(params.weights.appreciation, 10.0);
    }
}
