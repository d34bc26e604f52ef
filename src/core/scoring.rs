//! 場所與 bundle 的評分：
//! 整體熱門度 (opop)、主題一致性 (tcoh)、預估喜好度 (eapp)，
//! 以及三者的加權幾何平均。

use crate::core::bundle::Bundle;
use crate::core::similarity::{ResolvedVenue, TopicalSimilarity};
use crate::domain::model::ScoringWeights;

/// 使用者評過分的場所
#[derive(Debug, Clone)]
pub struct RatedVenue {
    pub venue: ResolvedVenue,
    /// 正規化評分，負值代表無法評分
    pub rating: f64,
}

impl RatedVenue {
    pub fn is_judged(&self) -> bool {
        self.rating >= 0.0
    }
}

impl ScoringWeights {
    /// 加權幾何平均。各分量先截到 >= 0，因此結果落在 [0, 1] 且不會是 NaN。
    pub fn combine(&self, opop: f64, tcoh: f64, eapp: f64) -> f64 {
        let total = self.popularity + self.coherence + self.appreciation;
        if total <= 0.0 {
            return 0.0;
        }

        let product = opop.max(0.0).powf(self.popularity)
            * tcoh.max(0.0).powf(self.coherence)
            * eapp.max(0.0).powf(self.appreciation);
        product.powf(1.0 / total)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// 單一 (使用者, 情境) 配對的評分器
pub struct Scorer<'a> {
    similarity: TopicalSimilarity<'a>,
    weights: ScoringWeights,
    max_likes: u64,
    profile: Vec<RatedVenue>,
}

impl<'a> Scorer<'a> {
    /// `local_venues` 用來決定 likes 的最大值（下限為 1，避免除以 0）
    pub fn new(
        similarity: TopicalSimilarity<'a>,
        weights: ScoringWeights,
        local_venues: &[ResolvedVenue],
        profile: Vec<RatedVenue>,
    ) -> Self {
        let max_likes = local_venues
            .iter()
            .map(ResolvedVenue::likes)
            .max()
            .unwrap_or(0)
            .max(1);

        Self {
            similarity,
            weights,
            max_likes,
            profile,
        }
    }

    pub fn similarity(&self) -> TopicalSimilarity<'a> {
        self.similarity
    }

    pub fn max_likes(&self) -> u64 {
        self.max_likes
    }

    pub fn profile(&self) -> &[RatedVenue] {
        &self.profile
    }

    pub fn opop(&self, venue: &ResolvedVenue) -> f64 {
        venue.likes() as f64 / self.max_likes as f64
    }

    /// 以主題相似度加權的使用者評分平均，只計入已評分 (>= 0) 的場所。
    /// 權重總和為 0（沒有可用評分，或與所有評分場所都不相似）時定義為 0。
    pub fn eapp(&self, venue: &ResolvedVenue) -> f64 {
        let (weighted, total_tsim) = self
            .profile
            .iter()
            .filter(|rated| rated.is_judged())
            .fold((0.0, 0.0), |(weighted, total), rated| {
                let tsim = self.similarity.tsim(venue, &rated.venue);
                (weighted + rated.rating * tsim, total + tsim)
            });

        if total_tsim > 0.0 {
            weighted / total_tsim
        } else {
            0.0
        }
    }

    pub fn bundle_opop(&self, bundle: &Bundle) -> f64 {
        mean(bundle.venues().iter().map(|v| self.opop(v)))
    }

    pub fn bundle_eapp(&self, bundle: &Bundle) -> f64 {
        mean(bundle.venues().iter().map(|v| self.eapp(v)))
    }

    /// 所有有序配對（含自身配對）的平均相似度，除以 n²
    pub fn tcoh(&self, bundle: &Bundle) -> f64 {
        let venues = bundle.venues();
        mean(
            venues
                .iter()
                .flat_map(|a| venues.iter().map(move |b| (a, b)))
                .map(|(a, b)| self.similarity.tsim(a, b)),
        )
    }

    pub fn score(&self, bundle: &Bundle) -> f64 {
        self.weights.combine(
            self.bundle_opop(bundle),
            self.tcoh(bundle),
            self.bundle_eapp(bundle),
        )
    }
}
