use clap::Parser;
use composite_suggester::domain::ports::ConfigProvider;
use composite_suggester::utils::{logger, validation::Validate};
use composite_suggester::{LocalStorage, SuggestionEngine, SuggestionPipeline, TomlConfig};
use std::path::Path;

#[derive(Parser)]
#[command(name = "toml-suggest")]
#[command(about = "Composite contextual suggester driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "suggest-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置（在初始化日誌前，才能決定日誌格式）
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based suggestion run");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".");
    let pipeline = SuggestionPipeline::new(storage, config);
    let engine = SuggestionEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Suggestion run completed successfully!");
            println!("✅ Suggestion run completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Suggestion run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let params = config.suggestion_params();

    println!("📋 Configuration Summary:");
    println!("  Run: {}", config.run.name);
    if let Some(description) = &config.run.description {
        println!("  Description: {}", description);
    }
    println!("  Output: {}/{}", config.output_path(), config.output_filename());
    println!(
        "  Bundles: {} returned out of {} built, up to {} venues each",
        params.bundles_to_return, params.bundles_to_create, params.venues_per_bundle
    );
    println!(
        "  Weights: popularity {}, coherence {}, appreciation {}",
        params.weights.popularity, params.weights.coherence, params.weights.appreciation
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn describe_input(label: &str, path: &str) {
    let status = if Path::new(path).exists() { "✅" } else { "❌ missing" };
    println!("  {}: {} {}", label, path, status);
}

fn perform_dry_run(config: &TomlConfig) {
    let paths = config.input_paths();

    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📂 Inputs:");
    describe_input("Categories", &paths.categories);
    describe_input("Venues", &paths.venues_dir);
    describe_input("Profiles", &paths.profiles);
    describe_input("Example mapping", &paths.example_mapping);
    describe_input("Contexts", &paths.contexts);
    describe_input("Venues per context", &paths.venues_per_context_dir);
    println!("  Located id suffix: {}", paths.located_ids_suffix);

    println!();
    println!("🎯 Selection:");
    match config.profile_ids() {
        Some(ids) => println!("  Profiles: {}", ids.join(", ")),
        None => println!("  Profiles: all"),
    }
    match config.context_ids() {
        Some(ids) => println!("  Contexts: {}", ids.join(", ")),
        None => println!("  Contexts: all"),
    }
    match config.category_blacklist() {
        Some(blacklist) => {
            println!("  Category filter: {} blacklisted categories", blacklist.len())
        }
        None => println!("  Category filter: disabled"),
    }

    println!();
    println!("💾 Output Configuration:");
    let output = config.output_settings();
    match &output.compression {
        Some(compression) => println!(
            "  Compression: {}/{} (ZIP, metadata: {})",
            config.output_path(),
            compression.filename,
            compression.include_metadata
        ),
        None if output.append => println!("  Mode: append to {}", output.filename),
        None => println!("  Mode: overwrite {}", output.filename),
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
