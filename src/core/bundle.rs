use crate::core::similarity::ResolvedVenue;

/// 有序的場所組合：pivot 在最前，其餘依加入順序排列。
/// 分數不快取在 bundle 上，一律由成員即時計算。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    venues: Vec<ResolvedVenue>,
}

impl Bundle {
    pub fn with_pivot(pivot: ResolvedVenue) -> Self {
        Self {
            venues: vec![pivot],
        }
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn venues(&self) -> &[ResolvedVenue] {
        &self.venues
    }

    pub fn pivot(&self) -> Option<&ResolvedVenue> {
        self.venues.first()
    }

    pub fn contains(&self, venue_id: &str) -> bool {
        self.venues.iter().any(|v| v.id() == venue_id)
    }

    /// 重複的場所不會被加入，回傳 false
    pub fn push(&mut self, venue: ResolvedVenue) -> bool {
        if self.contains(venue.id()) {
            return false;
        }
        self.venues.push(venue);
        true
    }

    pub fn venue_ids(&self) -> impl Iterator<Item = &str> {
        self.venues.iter().map(|v| v.id())
    }
}
