use composite_suggester::{LocalStorage, SuggestionEngine, SuggestionPipeline, TomlConfig};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

const HOTEL_CATEGORY: &str = "4bf58dd8d48988d1fa931735";

fn venue_json(id: &str, category: &str, likes: u64) -> String {
    serde_json::json!({
        "id": id,
        "name": format!("Venue {}", id),
        "categories": [{"id": category, "name": category, "icon": {"prefix": "p_", "suffix": ".png"}}],
        "likes": {"count": likes, "groups": []},
        "location": {"lat": 39.8, "lng": -89.6, "city": "Springfield", "country": "United States"}
    })
    .to_string()
}

/// 兩個情境（152 沒有場所清單）、兩位使用者、一個旅館與一個沒有分類的熱門場所（兩者都應被過濾），
/// 以及一個沒有 JSON 的場所
fn write_dataset(root: &Path) -> anyhow::Result<()> {
    let categories = serde_json::json!([
        {"id": "arts", "name": "Arts", "categories": [
            {"id": "museum", "name": "Museum"},
            {"id": "gallery", "name": "Gallery"}
        ]},
        {"id": "food", "name": "Food", "categories": [
            {"id": "restaurant", "name": "Restaurant"}
        ]},
        {"id": "park", "name": "Park"},
        {"id": HOTEL_CATEGORY, "name": "Hotel"}
    ]);
    std::fs::write(root.join("categories.json"), categories.to_string())?;

    let venues_dir = root.join("venues");
    std::fs::create_dir_all(&venues_dir)?;
    for (id, category, likes) in [
        ("m1", "museum", 50),
        ("m2", "museum", 30),
        ("g1", "gallery", 20),
        ("r1", "restaurant", 40),
        ("p1", "park", 10),
        ("h1", HOTEL_CATEGORY, 100),
        ("m9", "museum", 0),
        ("r9", "restaurant", 0),
    ] {
        std::fs::write(venues_dir.join(id), venue_json(id, category, likes))?;
    }
    let bare = serde_json::json!({"id": "bare", "name": "Bare", "categories": [], "likes": {"count": 500}});
    std::fs::write(venues_dir.join("bare"), bare.to_string())?;

    std::fs::write(root.join("examples2foursquare.csv"), "1,m9\n2,r9\n")?;
    std::fs::write(
        root.join("profiles.csv"),
        "id,attraction_id,description,website\n700,1,4,4\n700,2,1,1\n701,2,4,4\n702,3,4,4\n",
    )?;
    std::fs::write(
        root.join("contexts.csv"),
        "id,city,state,lat,long\n151,Springfield,IL,39.78,-89.65\n152,Shelbyville,IL,39.4,-88.8\n",
    )?;

    let per_context = root.join("venues_per_context");
    std::fs::create_dir_all(&per_context)?;
    std::fs::write(
        per_context.join("Springfield.ids.filtered"),
        "m1\nm2\ng1\n\nr1\np1\nh1\nbare\nghost\nm1\n",
    )?;

    Ok(())
}

fn config_toml(root: &Path, extra: &str) -> String {
    let root = root.display();
    format!(
        r#"
[run]
name = "integration"

[inputs]
categories = "{root}/categories.json"
venues_dir = "{root}/venues"
profiles = "{root}/profiles.csv"
example_mapping = "{root}/examples2foursquare.csv"
contexts = "{root}/contexts.csv"
venues_per_context_dir = "{root}/venues_per_context"

[bundles]
venues_per_bundle = 2
bundles_to_return = 2

{extra}
"#
    )
}

fn output_section(root: &Path, body: &str) -> String {
    format!("[output]\npath = \"{}/out\"\n{}", root.display(), body)
}

async fn run(config: TomlConfig) -> anyhow::Result<String> {
    let pipeline = SuggestionPipeline::new(LocalStorage::new(""), config);
    let engine = SuggestionEngine::new(pipeline);
    Ok(engine.run().await?)
}

fn parse_lines(content: &str) -> Vec<Vec<String>> {
    content
        .lines()
        .map(|line| line.split(' ').map(str::to_string).collect())
        .collect()
}

#[tokio::test]
async fn test_end_to_end_run_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_dataset(temp_dir.path())?;
    let config = TomlConfig::from_toml_str(&config_toml(
        temp_dir.path(),
        &output_section(temp_dir.path(), ""),
    ))?;

    let output_path = run(config).await?;
    assert!(output_path.ends_with("/out/suggestions.txt"));

    let content = std::fs::read_to_string(&output_path)?;
    let lines = parse_lines(&content);
    assert!(!lines.is_empty());

    // 152 沒有場所清單，702 沒有可對照的評分
    for fields in &lines {
        assert!(fields[0] == "700_151" || fields[0] == "701_151", "{:?}", fields);
        assert!(fields.len() == 4 || fields.len() == 5);
        assert_ne!(fields[2], "h1");
        assert_ne!(fields[2], "bare");
        assert_ne!(fields[2], "ghost");
        let score: f64 = fields[3].parse()?;
        assert!((0.0..=1.0).contains(&score));
    }

    // 使用者依 id 排序，且每位使用者至多 2 個 bundle，每個至多 2 個場所
    let first_701 = lines.iter().position(|f| f[0] == "701_151").unwrap_or(lines.len());
    assert!(lines[..first_701].iter().all(|f| f[0] == "700_151"));
    assert!(lines[first_701..].iter().all(|f| f[0] == "701_151"));
    for fields in &lines {
        let (bundle_rank, venue_rank) = fields[1].split_once('.').unwrap();
        assert!(bundle_rank.parse::<usize>()? <= 2);
        assert!(venue_rank.parse::<usize>()? <= 2);
    }

    // 700 最喜歡博物館：第一個 bundle 是兩間博物館，並以 m9 作為解釋
    assert_eq!(lines[0][1..3], ["1.1".to_string(), "m1".to_string()]);
    assert_eq!(lines[1][1..3], ["1.2".to_string(), "m2".to_string()]);
    assert_eq!(lines[0].get(4).map(String::as_str), Some("m9"));
    assert_eq!(lines[1].get(4).map(String::as_str), Some("m9"));

    // 同一使用者內，bundle 分數不遞增
    let scores_700: Vec<f64> = lines[..first_701]
        .iter()
        .map(|f| f[3].parse::<f64>())
        .collect::<Result<_, _>>()?;
    for pair in scores_700.windows(2) {
        assert!(pair[0] >= pair[1]);
    }

    // 不會出現重複的場所
    let venues_700: Vec<&str> = lines[..first_701].iter().map(|f| f[2].as_str()).collect();
    let mut deduped = venues_700.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), venues_700.len());

    Ok(())
}

#[tokio::test]
async fn test_repeated_runs_are_identical() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_dataset(temp_dir.path())?;
    let toml = config_toml(temp_dir.path(), &output_section(temp_dir.path(), ""));

    let first_path = run(TomlConfig::from_toml_str(&toml)?).await?;
    let first = std::fs::read(&first_path)?;
    let second_path = run(TomlConfig::from_toml_str(&toml)?).await?;
    let second = std::fs::read(&second_path)?;

    assert_eq!(first_path, second_path);
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_zip_output_with_metadata() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_dataset(temp_dir.path())?;
    let output = output_section(
        temp_dir.path(),
        "filename = \"run.txt\"\n\n[output.compression]\nenabled = true\nfilename = \"run.zip\"\ninclude_metadata = true\n",
    );
    let config = TomlConfig::from_toml_str(&config_toml(temp_dir.path(), &output))?;

    let output_path = run(config).await?;
    assert!(output_path.ends_with("/out/run.zip"));

    let zip_data = std::fs::read(&output_path)?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 2);

    let mut run_file = String::new();
    archive.by_name("run.txt")?.read_to_string(&mut run_file)?;
    assert!(run_file.starts_with("700_151 1.1 m1 "));

    let mut metadata = String::new();
    archive.by_name("metadata.json")?.read_to_string(&mut metadata)?;
    let metadata: serde_json::Value = serde_json::from_str(&metadata)?;
    assert_eq!(metadata["lines"].as_u64(), Some(run_file.lines().count() as u64));
    assert_eq!(metadata["pairs_processed"].as_u64(), Some(2));
    assert_eq!(metadata["failed_units"].as_u64(), Some(1));
    assert!(metadata["generated_at"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_id_filters_select_pairs() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_dataset(temp_dir.path())?;
    let extra = format!(
        "[filter]\nprofile_ids = [\"701\", \"999\"]\ncontext_ids = [\"151\"]\n\n{}",
        output_section(temp_dir.path(), "")
    );
    let config = TomlConfig::from_toml_str(&config_toml(temp_dir.path(), &extra))?;

    let content = std::fs::read_to_string(run(config).await?)?;
    assert!(!content.is_empty());
    assert!(content.lines().all(|line| line.starts_with("701_151 ")));
    Ok(())
}

#[tokio::test]
async fn test_unknown_filter_ids_produce_empty_output() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_dataset(temp_dir.path())?;
    let extra = format!(
        "[filter]\nprofile_ids = [\"999\"]\n\n{}",
        output_section(temp_dir.path(), "")
    );
    let config = TomlConfig::from_toml_str(&config_toml(temp_dir.path(), &extra))?;

    let content = std::fs::read_to_string(run(config).await?)?;
    assert!(content.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_context_list_does_not_stop_the_run() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_dataset(temp_dir.path())?;
    let extra = format!(
        "[filter]\ncontext_ids = [\"152\"]\n\n{}",
        output_section(temp_dir.path(), "")
    );
    let config = TomlConfig::from_toml_str(&config_toml(temp_dir.path(), &extra))?;

    let content = std::fs::read_to_string(run(config).await?)?;
    assert!(content.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_append_mode_accumulates_runs() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_dataset(temp_dir.path())?;
    let toml = config_toml(temp_dir.path(), &output_section(temp_dir.path(), "append = true\n"));

    let path = run(TomlConfig::from_toml_str(&toml)?).await?;
    let once = std::fs::read_to_string(&path)?;
    run(TomlConfig::from_toml_str(&toml)?).await?;
    let twice = std::fs::read_to_string(&path)?;

    assert!(!once.is_empty());
    assert_eq!(twice, format!("{}{}", once, once));
    Ok(())
}

#[tokio::test]
async fn test_disabled_category_filter_keeps_hotels() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_dataset(temp_dir.path())?;
    let toml = config_toml(
        temp_dir.path(),
        &format!(
            "[filter]\ncategory_filter = false\n\n{}",
            output_section(temp_dir.path(), "")
        ),
    )
    .replace("bundles_to_return = 2", "bundles_to_return = 10");
    let config = TomlConfig::from_toml_str(&toml)?;

    let content = std::fs::read_to_string(run(config).await?)?;
    // 10 個 bundle 足以涵蓋所有場所
    assert!(content.lines().any(|line| line.split(' ').nth(2) == Some("h1")));
    Ok(())
}

fn suggested_venues(content: &str) -> Vec<String> {
    parse_lines(content).into_iter().map(|f| f[2].clone()).collect()
}

#[tokio::test]
async fn test_disabled_category_filter_keeps_uncategorized_venues() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_dataset(temp_dir.path())?;

    for filter in ["category_filter = false", "category_blacklist = []"] {
        let toml = config_toml(
            temp_dir.path(),
            &format!("[filter]\n{}\n\n{}", filter, output_section(temp_dir.path(), "")),
        )
        .replace("bundles_to_return = 2", "bundles_to_return = 10");
        let content = std::fs::read_to_string(run(TomlConfig::from_toml_str(&toml)?).await?)?;

        // 10 個 bundle 足以涵蓋所有場所
        let venues = suggested_venues(&content);
        assert!(venues.iter().any(|v| v == "bare"), "{}: {:?}", filter, venues);
        assert!(venues.iter().any(|v| v == "h1"), "{}: {:?}", filter, venues);
    }
    Ok(())
}

#[tokio::test]
async fn test_malformed_context_row_is_skipped() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_dataset(temp_dir.path())?;
    std::fs::write(
        temp_dir.path().join("contexts.csv"),
        "id,city,state,lat,long\n150,Ogdenville,IL,north,-89.6\n151,Springfield,IL,39.78,-89.65\n",
    )?;
    let config = TomlConfig::from_toml_str(&config_toml(
        temp_dir.path(),
        &output_section(temp_dir.path(), ""),
    ))?;

    let content = std::fs::read_to_string(run(config).await?)?;
    let lines = parse_lines(&content);
    assert!(!lines.is_empty());
    assert!(lines.iter().all(|f| f[0] == "700_151" || f[0] == "701_151"));
    assert_eq!(lines[0][1..3], ["1.1".to_string(), "m1".to_string()]);
    Ok(())
}
