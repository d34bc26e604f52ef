use crate::core::taxonomy::{NodeId, Taxonomy};
use crate::domain::model::Venue;
use crate::utils::error::Result;

/// 分類距離 d 對應的相似度 1 / (1 + d)
pub fn similarity_from_distance(distance: usize) -> f64 {
    1.0 / (1.0 + distance as f64)
}

/// 已對照分類樹的場所
#[derive(Debug, Clone)]
pub struct ResolvedVenue {
    pub venue: Venue,
    pub categories: Vec<NodeId>,
}

impl ResolvedVenue {
    pub fn id(&self) -> &str {
        &self.venue.id
    }

    pub fn likes(&self) -> u64 {
        self.venue.likes
    }
}

impl PartialEq for ResolvedVenue {
    fn eq(&self, other: &Self) -> bool {
        self.venue == other.venue
    }
}

/// 以分類樹距離計算兩場所的主題相似度 (tsim)
#[derive(Debug, Clone, Copy)]
pub struct TopicalSimilarity<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> TopicalSimilarity<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// 分類樹中找不到的分類會被略過並記錄警告；
    /// 完全沒有可用分類的場所與任何場所的相似度都是 0。
    pub fn resolve(&self, venue: Venue) -> ResolvedVenue {
        let mut categories = Vec::with_capacity(venue.categories.len());
        for category_id in venue.categories.keys() {
            match self.taxonomy.lookup(category_id) {
                Ok(node) => categories.push(node),
                Err(e) => tracing::warn!("🔶 Venue {}: {}, category ignored", venue.id, e),
            }
        }

        if categories.is_empty() {
            tracing::warn!(
                "🔶 Venue {} has no category in the category tree, topical similarity will be 0",
                venue.id
            );
        }

        ResolvedVenue { venue, categories }
    }

    /// 兩組分類間的最短距離；任一邊為空時為 None
    pub fn min_distance(&self, a: &[NodeId], b: &[NodeId]) -> Option<usize> {
        a.iter()
            .flat_map(|ca| b.iter().map(move |cb| (*ca, *cb)))
            .map(|(ca, cb)| self.taxonomy.node_distance(ca, cb))
            .min()
    }

    /// 所有分類配對中相似度的最大值
    pub fn tsim(&self, a: &ResolvedVenue, b: &ResolvedVenue) -> f64 {
        self.min_distance(&a.categories, &b.categories)
            .map(similarity_from_distance)
            .unwrap_or(0.0)
    }

    /// 至少共享一個相同分類（整數距離為 0，避免浮點比較）
    pub fn identical_topic(&self, a: &ResolvedVenue, b: &ResolvedVenue) -> bool {
        self.min_distance(&a.categories, &b.categories) == Some(0)
    }

    /// 直接以原始場所計算；未知分類會回傳錯誤
    pub fn tsim_venues(&self, a: &Venue, b: &Venue) -> Result<f64> {
        let lookup = |venue: &Venue| -> Result<Vec<NodeId>> {
            venue
                .categories
                .keys()
                .map(|id| self.taxonomy.lookup(id))
                .collect()
        };
        let categories_a = lookup(a)?;
        let categories_b = lookup(b)?;

        Ok(self
            .min_distance(&categories_a, &categories_b)
            .map(similarity_from_distance)
            .unwrap_or(0.0))
    }
}
