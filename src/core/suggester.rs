use crate::core::bundler::BundleConstructor;
use crate::core::explanation::ExplanationFinder;
use crate::core::scoring::{RatedVenue, Scorer};
use crate::core::selector::BundleSelector;
use crate::core::similarity::{ResolvedVenue, TopicalSimilarity};
use crate::core::taxonomy::Taxonomy;
use crate::domain::model::{Context, SuggestionLine, SuggestionParams, User, Venue};
use std::collections::HashMap;

/// 將分類樹、使用者評分與在地場所串起來，為單一 (使用者, 情境) 配對產生推薦
pub struct BundleSuggester<'a> {
    taxonomy: &'a Taxonomy,
    params: SuggestionParams,
}

impl<'a> BundleSuggester<'a> {
    pub fn new(taxonomy: &'a Taxonomy, params: SuggestionParams) -> Self {
        Self { taxonomy, params }
    }

    /// 保留輸入順序；此順序即為同分時的優先順序
    pub fn resolve_venues(&self, venues: Vec<Venue>) -> Vec<ResolvedVenue> {
        let similarity = TopicalSimilarity::new(self.taxonomy);
        venues.into_iter().map(|v| similarity.resolve(v)).collect()
    }

    /// 依使用者評分（id 排序）建立檔案；找不到場所資料的評分會被略過。
    /// `rated_venues` 須事先以 [`Self::resolve_venues`] 解析過。
    pub fn build_profile(
        &self,
        user: &User,
        rated_venues: &HashMap<String, ResolvedVenue>,
    ) -> Vec<RatedVenue> {
        let mut profile = Vec::with_capacity(user.venue_ratings.len());

        for (venue_id, rating) in &user.venue_ratings {
            match rated_venues.get(venue_id) {
                Some(venue) => profile.push(RatedVenue {
                    venue: venue.clone(),
                    rating: *rating,
                }),
                None => tracing::debug!(
                    "👤 User {}: no venue record for rated venue {}, rating ignored",
                    user.id,
                    venue_id
                ),
            }
        }

        profile
    }

    pub fn suggest(
        &self,
        user: &User,
        context: &Context,
        local_venues: &[ResolvedVenue],
        rated_venues: &HashMap<String, ResolvedVenue>,
    ) -> Vec<SuggestionLine> {
        let profile = self.build_profile(user, rated_venues);
        let scorer = Scorer::new(
            TopicalSimilarity::new(self.taxonomy),
            self.params.weights,
            local_venues,
            profile,
        );

        let candidates = BundleConstructor::new(&scorer, self.params.venues_per_bundle)
            .build(local_venues, self.params.bundles_to_create);
        let candidate_count = candidates.len();
        let chosen = BundleSelector::new(&scorer).choose(candidates, self.params.bundles_to_return);

        tracing::debug!(
            "🧺 {}_{}: {} local venues, {} rated, {} candidates, {} bundles chosen",
            user.id,
            context.id,
            local_venues.len(),
            scorer.profile().len(),
            candidate_count,
            chosen.len()
        );

        let finder = ExplanationFinder::new(&scorer);
        let mut lines = Vec::new();
        for (bundle_index, ranked) in chosen.iter().enumerate() {
            for (venue_index, venue) in ranked.bundle.venues().iter().enumerate() {
                let similar_venue_ids = finder
                    .similar_relevant_venues(venue)
                    .into_iter()
                    .map(|rated| rated.venue.id().to_string())
                    .collect();

                lines.push(SuggestionLine {
                    user_id: user.id.clone(),
                    context_id: context.id.clone(),
                    bundle_rank: bundle_index + 1,
                    venue_rank: venue_index + 1,
                    venue_id: venue.id().to_string(),
                    bundle_score: ranked.score,
                    similar_venue_ids,
                });
            }
        }

        lines
    }
}
