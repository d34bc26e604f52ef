//! Foursquare 分類檔與場所 JSON 的解析

use crate::core::taxonomy::{CategorySource, Taxonomy};
use crate::domain::model::{GeoPoint, Venue};
use crate::utils::error::{Result, SuggestError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawVenue {
    id: String,
    name: String,
    #[serde(default)]
    categories: Vec<RawCategory>,
    #[serde(default)]
    likes: Option<RawCount>,
    #[serde(default)]
    location: Option<RawLocation>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawCount {
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    lat: Option<f64>,
    lng: Option<f64>,
    city: Option<String>,
    country: Option<String>,
}

/// 解析分類檔（JSON 陣列）；頂層可以直接是陣列，也可以是 `{"categories": [...]}`
pub fn parse_category_forest(data: &[u8]) -> Result<Vec<CategorySource>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Forest {
        Bare(Vec<CategorySource>),
        Wrapped { categories: Vec<CategorySource> },
    }

    let forest: Forest = serde_json::from_slice(data)?;
    Ok(match forest {
        Forest::Bare(categories) | Forest::Wrapped { categories } => categories,
    })
}

pub fn load_taxonomy(data: &[u8]) -> Result<Taxonomy> {
    Taxonomy::from_forest(parse_category_forest(data)?)
}

/// 解析單一場所 JSON；未列出的欄位一律忽略
pub fn parse_venue(data: &[u8]) -> Result<Venue> {
    let raw: RawVenue = serde_json::from_slice(data)?;

    if raw.id.trim().is_empty() {
        return Err(SuggestError::DataFormatError {
            source_name: "venue".to_string(),
            message: "venue id is empty".to_string(),
        });
    }

    let mut venue = Venue::new(raw.id, raw.likes.map(|l| l.count).unwrap_or(0));
    venue.name = raw.name;
    for category in raw.categories {
        venue = venue.with_category(category.id, category.name);
    }

    if let Some(location) = raw.location {
        venue.location = match (location.lat, location.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        };
        venue.city = location.city;
        venue.country = location.country;
    }

    Ok(venue)
}
