use crate::core::scoring::{RatedVenue, Scorer};
use crate::core::similarity::ResolvedVenue;

/// 最高的兩個評分級距（原始評分 3 與 4）
pub fn is_top_rating(rating: f64) -> bool {
    rating == 0.75 || rating == 1.0
}

/// 為推薦的場所找出使用者曾給高分、且主題完全相同的場所，
/// 作為推薦理由一併輸出。
pub struct ExplanationFinder<'s, 'a> {
    scorer: &'s Scorer<'a>,
}

impl<'s, 'a> ExplanationFinder<'s, 'a> {
    pub fn new(scorer: &'s Scorer<'a>) -> Self {
        Self { scorer }
    }

    /// 依 eapp 由高到低排序（而非原始評分），藉此反映整份使用者檔案
    pub fn similar_relevant_venues(&self, venue: &ResolvedVenue) -> Vec<&'s RatedVenue> {
        let similarity = self.scorer.similarity();

        let mut matches: Vec<(f64, &'s RatedVenue)> = self
            .scorer
            .profile()
            .iter()
            .filter(|rated| is_top_rating(rated.rating))
            .filter(|rated| similarity.identical_topic(venue, &rated.venue))
            .map(|rated| (self.scorer.eapp(&rated.venue), rated))
            .collect();

        matches.sort_by(|a, b| b.0.total_cmp(&a.0));
        matches.into_iter().map(|(_, rated)| rated).collect()
    }
}
