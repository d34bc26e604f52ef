use crate::core::bundle::Bundle;
use crate::core::scoring::Scorer;

#[derive(Debug, Clone)]
pub struct RankedBundle {
    pub bundle: Bundle,
    pub score: f64,
}

/// 從候選池中反覆取出分數最高的 bundle。
/// 每一輪都重新計算分數（選擇排序），不做快取。
pub struct BundleSelector<'s, 'a> {
    scorer: &'s Scorer<'a>,
}

impl<'s, 'a> BundleSelector<'s, 'a> {
    pub fn new(scorer: &'s Scorer<'a>) -> Self {
        Self { scorer }
    }

    /// 回傳至多 `count` 個 bundle，由高分到低分排列；同分時取先出現者
    pub fn choose(&self, candidates: Vec<Bundle>, count: usize) -> Vec<RankedBundle> {
        let mut pool = candidates;
        let mut chosen = Vec::with_capacity(count.min(pool.len()));

        while chosen.len() < count {
            let Some((index, score)) = self.find_max_score(&pool) else {
                break;
            };
            let bundle = pool.remove(index);
            chosen.push(RankedBundle { bundle, score });
        }

        chosen
    }

    fn find_max_score(&self, pool: &[Bundle]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, bundle) in pool.iter().enumerate() {
            let score = self.scorer.score(bundle);
            if best.map_or(true, |(_, max)| score > max) {
                best = Some((index, score));
            }
        }
        best
    }
}
