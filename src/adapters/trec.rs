//! TREC Contextual Suggestion 的資料檔：範例場所對照、使用者評分、情境與各情境的場所清單

use crate::domain::model::{normalize_rating, Context, User};
use crate::utils::error::{Result, SuggestError};
use std::collections::{BTreeMap, HashMap};

const RATING_MIN: i32 = -1;
const RATING_MAX: i32 = 4;

fn reader(data: &[u8], has_headers: bool) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data)
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// 範例場所 id -> Foursquare 場所 id（無標題列）
pub fn parse_example_mapping(data: &[u8]) -> Result<HashMap<String, String>> {
    let mut mapping = HashMap::new();

    for result in reader(data, false).records() {
        let record = result?;
        match (record.get(0), record.get(1)) {
            (Some(example_id), Some(venue_id)) if !example_id.is_empty() && !venue_id.is_empty() => {
                mapping.insert(example_id.to_string(), venue_id.to_string());
            }
            _ => tracing::warn!(
                "🔶 Example mapping line {}: expected 'exampleId,foursquareId', skipped",
                line_of(&record)
            ),
        }
    }

    tracing::debug!("🔗 Loaded {} example-to-venue mappings", mapping.len());
    Ok(mapping)
}

/// 解析使用者評分檔（第一列為標題）。
/// 對照不到 Foursquare 場所的列會被略過；評分無法解析或超出 -1..=4 的列記錄警告後略過。
pub fn parse_profiles(
    data: &[u8],
    example_mapping: &HashMap<String, String>,
) -> Result<BTreeMap<String, User>> {
    let mut users: BTreeMap<String, User> = BTreeMap::new();
    let mut unmapped = 0usize;

    for result in reader(data, true).records() {
        let record = result?;
        let line = line_of(&record);

        let (Some(user_id), Some(example_id), Some(raw_rating)) =
            (record.get(0), record.get(1), record.get(3))
        else {
            tracing::warn!("🔶 Profile line {}: too few columns, skipped", line);
            continue;
        };

        let rating = match raw_rating.parse::<i32>() {
            Ok(r) if (RATING_MIN..=RATING_MAX).contains(&r) => r,
            _ => {
                tracing::warn!(
                    "🔶 Profile line {}: invalid rating '{}' for user {}, skipped",
                    line,
                    raw_rating,
                    user_id
                );
                continue;
            }
        };

        let Some(venue_id) = example_mapping.get(example_id) else {
            unmapped += 1;
            continue;
        };

        users
            .entry(user_id.to_string())
            .or_insert_with(|| User::new(user_id))
            .rate(venue_id.clone(), normalize_rating(rating));
    }

    if unmapped > 0 {
        tracing::debug!("👤 {} profile rows had no Foursquare venue, skipped", unmapped);
    }
    tracing::debug!("👤 Loaded {} user profiles", users.len());
    Ok(users)
}

/// 解析情境檔（第一列為標題）：id, name, _, lat, lon。
/// 欄位不足或座標無法解析的列記錄警告後略過，其餘情境照常處理。
pub fn parse_contexts(data: &[u8]) -> Result<BTreeMap<String, Context>> {
    let mut contexts = BTreeMap::new();

    for result in reader(data, true).records() {
        let record = result?;
        let line = line_of(&record);

        let (Some(id), Some(name), Some(lat), Some(lon)) =
            (record.get(0), record.get(1), record.get(3), record.get(4))
        else {
            tracing::warn!("🔶 Context line {}: expected at least 5 columns, skipped", line);
            continue;
        };

        let (Ok(latitude), Ok(longitude)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
            tracing::warn!(
                "🔶 Context line {}: invalid coordinates '{}', '{}' for context {}, skipped",
                line,
                lat,
                lon,
                id
            );
            continue;
        };

        contexts.insert(
            id.to_string(),
            Context {
                id: id.to_string(),
                name: name.to_string(),
                latitude,
                longitude,
            },
        );
    }

    tracing::debug!("🏙️ Loaded {} contexts", contexts.len());
    Ok(contexts)
}

/// 每行一個場所 id；空白行忽略，保留檔案中的順序
pub fn parse_located_ids(data: &[u8]) -> Result<Vec<String>> {
    let text = std::str::from_utf8(data).map_err(|e| SuggestError::DataFormatError {
        source_name: "located ids".to_string(),
        message: e.to_string(),
    })?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
