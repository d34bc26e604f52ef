use crate::domain::model::Venue;
use std::collections::HashSet;

/// 預設的非觀光分類（行政區、住宅、交通設施、住宿等）
pub const DEFAULT_CATEGORY_BLACKLIST: &[&str] = &[
    "530e33ccbcbc57f1066bbfe4", // States & Municipalities
    "50aa9e094b90af0d42d5de0d", // City
    "5345731ebcbc57f1066c39b2", // County
    "530e33ccbcbc57f1066bbff7", // Country
    "530e33ccbcbc57f1066bbff8", // State
    "530e33ccbcbc57f1066bbff3", // Town
    "4bf58dd8d48988d196941735", // Hospital
    "4bf58dd8d48988d124941735", // Office
    "4c38df4de52ce0d596b336e1", // Parking
    "4e67e38e036454776db1fb3a", // Residence
    "5032891291d4c4b30a586d68", // Assisted Living
    "4bf58dd8d48988d103941735", // Home (private)
    "4f2a210c4b9023bd5841ed28", // Housing Development
    "4d954b06a243a5684965b473", // Residential Building (Apartment / Condo)
    "4bf58dd8d48988d1d5941735", // Hotel Bar
    "4d4b7105d754a06379d81259", // Travel & Transport
    "4bf58dd8d48988d1ed931735", // Airport
    "4bf58dd8d48988d1ef931735", // Airport Food Court
    "4bf58dd8d48988d1f0931735", // Airport Gate
    "4eb1bc533b7b2c5b1d4306cb", // Airport Lounge
    "4bf58dd8d48988d1eb931735", // Airport Terminal
    "4bf58dd8d48988d1ec931735", // Airport Tram
    "4bf58dd8d48988d1f7931735", // Plane
    "4bf58dd8d48988d12d951735", // Boat or Ferry
    "52f2ab2ebcbc57f1066b8b4b", // Border Crossing
    "4bf58dd8d48988d1fe931735", // Bus Station
    "4bf58dd8d48988d12b951735", // Bus Line
    "52f2ab2ebcbc57f1066b8b4f", // Bus Stop
    "52f2ab2ebcbc57f1066b8b50", // Cable Car
    "4bf58dd8d48988d1f6931735", // General Travel
    "4bf58dd8d48988d1fa931735", // Hotel
    "4bf58dd8d48988d1f8931735", // Bed & Breakfast
    "4f4530a74b9074f6e4fb0100", // Boarding House
    "4bf58dd8d48988d1ee931735", // Hostel
    "4bf58dd8d48988d132951735", // Hotel Pool
    "4bf58dd8d48988d1fb931735", // Motel
    "4bf58dd8d48988d12f951735", // Resort
    "4bf58dd8d48988d133951735", // Roof Deck
    "52f2ab2ebcbc57f1066b8b4c", // Intersection
    "4bf58dd8d48988d1fc931735", // Light Rail
    "4f2a23984b9023bd5841ed2c", // Moving Target
    "52f2ab2ebcbc57f1066b8b53", // RV Park
    "4bf58dd8d48988d1ef941735", // Rental Car Location
    "4d954b16a243a5684b65b473", // Rest Area
    "4bf58dd8d48988d1f9931735", // Road
    "52f2ab2ebcbc57f1066b8b52", // Street
    "4bf58dd8d48988d1fd931735", // Subway
    "4bf58dd8d48988d130951735", // Taxi
    "52f2ab2ebcbc57f1066b8b4d", // Toll Booth
    "52f2ab2ebcbc57f1066b8b4e", // Toll Plaza
    "4f4530164b9074f6e4fb00ff", // Tourist Information Center
    "4bf58dd8d48988d129951735", // Train Station
    "4f4531504b9074f6e4fb0102", // Platform
    "4bf58dd8d48988d12a951735", // Train
    "52f2ab2ebcbc57f1066b8b51", // Tram
    "4f04b25d2fb6e1c99f3db0c0", // Travel Lounge
    "52f2ab2ebcbc57f1066b8b4a", // Tunnel
];

/// 用來排除非觀光場所的分類黑名單
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBlacklist {
    ids: HashSet<String>,
}

impl CategoryBlacklist {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, category_id: &str) -> bool {
        self.ids.contains(category_id)
    }

    /// 所有分類都在黑名單中才算；沒有任何分類的場所也會被排除
    pub fn is_blacklisted_strict(&self, venue: &Venue) -> bool {
        venue.categories.keys().all(|id| self.contains(id))
    }
}

impl Default for CategoryBlacklist {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY_BLACKLIST.iter().copied())
    }
}
