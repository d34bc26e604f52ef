//! bobo（bundles one-by-one）：以熱門場所為 pivot，貪婪地長出候選 bundle。

use crate::core::bundle::Bundle;
use crate::core::scoring::Scorer;
use crate::core::similarity::ResolvedVenue;

/// 建構過程中的候選池：場所 arena 加上「仍可用」旗標。
/// 被放進任何 bundle 的場所（含 pivot）都會移出候選池，也不再當 pivot。
struct WorkingSet<'v> {
    venues: &'v [ResolvedVenue],
    available: Vec<bool>,
    remaining: usize,
}

impl<'v> WorkingSet<'v> {
    fn new(venues: &'v [ResolvedVenue]) -> Self {
        Self {
            venues,
            available: vec![true; venues.len()],
            remaining: venues.len(),
        }
    }

    fn is_available(&self, index: usize) -> bool {
        self.available[index]
    }

    fn take(&mut self, index: usize) -> ResolvedVenue {
        if self.available[index] {
            self.available[index] = false;
            self.remaining -= 1;
        }
        self.venues[index].clone()
    }

    fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// 依 arena 順序走訪仍可用的場所
    fn available_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.venues.len()).filter(move |i| self.available[*i])
    }
}

pub struct BundleConstructor<'s, 'a> {
    scorer: &'s Scorer<'a>,
    max_venues_per_bundle: usize,
}

impl<'s, 'a> BundleConstructor<'s, 'a> {
    pub fn new(scorer: &'s Scorer<'a>, max_venues_per_bundle: usize) -> Self {
        Self {
            scorer,
            max_venues_per_bundle,
        }
    }

    /// 產生至多 `bundle_count` 個互不重疊的 bundle，每個至多
    /// `max_venues_per_bundle` 個場所。同分時以 `local_venues` 中先出現者為準。
    pub fn build(&self, local_venues: &[ResolvedVenue], bundle_count: usize) -> Vec<Bundle> {
        let mut bundles = Vec::new();
        if self.max_venues_per_bundle == 0 || bundle_count == 0 {
            return bundles;
        }

        // eapp 只依賴場所本身，先算好供每一輪挑選使用
        let appreciation: Vec<f64> = local_venues.iter().map(|v| self.scorer.eapp(v)).collect();

        // 穩定排序：熱門度相同時保留載入順序
        let mut pivots: Vec<usize> = (0..local_venues.len()).collect();
        pivots.sort_by(|a, b| {
            self.scorer
                .opop(&local_venues[*b])
                .total_cmp(&self.scorer.opop(&local_venues[*a]))
        });

        let mut pool = WorkingSet::new(local_venues);

        for pivot in pivots {
            if bundles.len() >= bundle_count {
                break;
            }
            if !pool.is_available(pivot) {
                continue;
            }

            let mut bundle = Bundle::with_pivot(pool.take(pivot));
            while bundle.len() < self.max_venues_per_bundle && !pool.is_exhausted() {
                let Some(best) = self.best_companion(&pool, pivot, &appreciation) else {
                    break;
                };
                bundle.push(pool.take(best));
            }

            tracing::trace!(
                "🧺 Bundle {} built around pivot {} with {} venues",
                bundles.len() + 1,
                local_venues[pivot].id(),
                bundle.len()
            );
            bundles.push(bundle);
        }

        bundles
    }

    /// 最大化 (2·tsim(pivot, v) + eapp(v)) / 3 的場所
    fn best_companion(
        &self,
        pool: &WorkingSet<'_>,
        pivot: usize,
        appreciation: &[f64],
    ) -> Option<usize> {
        let similarity = self.scorer.similarity();
        let pivot_venue = &pool.venues[pivot];

        let mut best: Option<(usize, f64)> = None;
        for index in pool.available_indices() {
            let criterion =
                (2.0 * similarity.tsim(pivot_venue, &pool.venues[index]) + appreciation[index]) / 3.0;
            if best.map_or(true, |(_, max)| criterion > max) {
                best = Some((index, criterion));
            }
        }
        best.map(|(index, _)| index)
    }
}
