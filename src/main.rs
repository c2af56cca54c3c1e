use clap::Parser;
use house_finder::config::secrets::Secret;
use house_finder::utils::error::ErrorSeverity;
use house_finder::utils::logger::{self, LogFormat};
use house_finder::utils::validation::Validate;
use house_finder::{
    build_objectives, CachedMaps, CliArgs, Evaluator, FinderConfig, FinderEngine, GoogleMapsClient,
    HouseFinderError, JsonListingSource, ReportRenderer, ResultCache,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_logger(LogFormat::from_json_flag(args.json_logs), args.verbose);

    tracing::info!("🚀 Starting house-finder");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match FinderConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(listings) = &args.listings {
        config.listings.path = listings.clone();
        tracing::info!("🔧 Listings file overridden to: {}", listings);
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
        tracing::info!("🔧 Output path overridden to: {}", output);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let cache = match ResultCache::open(config.cache_directory()).await {
        Ok(cache) => Arc::new(cache),
        Err(e) => exit_with(e),
    };

    let result = run(&config, &args, Arc::clone(&cache)).await;

    // 不論成功與否都要釋放快取檔
    if let Err(e) = cache.close().await {
        tracing::error!("❌ Failed to close result cache: {}", e);
    }
    tracing::info!(
        "🗄️ Cache: {} entries, {} hits, {} computations",
        cache.len(),
        cache.hits(),
        cache.computations()
    );

    match result {
        Ok(Some(output_path)) => {
            tracing::info!("✅ Ranking completed successfully!");
            println!("✅ Ranking completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Ok(None) => {}
        Err(e) => exit_with(e),
    }

    Ok(())
}

/// 建立目標並執行排名；dry run 只建立目標，回傳 `None`
async fn run(
    config: &FinderConfig,
    args: &CliArgs,
    cache: Arc<ResultCache>,
) -> house_finder::Result<Option<String>> {
    let secret = Secret::from_config(&config.maps.secret)?;
    let client = match config.maps.timeout_seconds {
        Some(seconds) => {
            GoogleMapsClient::with_timeout(config.maps_base_url(), secret, Duration::from_secs(seconds))?
        }
        None => GoogleMapsClient::new(config.maps_base_url(), secret),
    };
    let maps = CachedMaps::new(Arc::new(client), cache);

    let objectives = build_objectives(&config.objectives, &maps).await?;
    tracing::info!("🎯 Built {} objectives", objectives.len());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No listings will be evaluated");
        println!("🔍 Dry Run Analysis:");
        for objective in &objectives {
            match objective.maximum() {
                Some(maximum) => println!("  🎯 {} (maximum {})", objective.name(), maximum),
                None => println!("  🎯 {}", objective.name()),
            }
        }
        return Ok(None);
    }

    let evaluator = Evaluator::new(objectives).with_concurrency(config.concurrent_requests());
    let engine = FinderEngine::new(
        JsonListingSource::new(&config.listings.path),
        ReportRenderer::new(&config.output.path, config.output.formats.clone()),
        evaluator,
        config.search.clone(),
    )
    .with_rule(config.dominance_rule());

    engine.run().await.map(Some)
}

fn exit_with(e: HouseFinderError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Ranking failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2, // 外部服務錯誤，可重試
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3, // 系統錯誤
    };
    std::process::exit(exit_code);
}

fn display_config_summary(config: &FinderConfig, args: &CliArgs) {
    println!("📋 Configuration Summary:");
    println!(
        "  Search: {} {} (price {}-{}, bedrooms {}-{})",
        config.search.area,
        config.search.r#type,
        config.search.price.min,
        config.search.price.max,
        config.search.bedrooms.min,
        config.search.bedrooms.max
    );
    println!(
        "  Objectives: {}",
        config
            .objectives
            .iter()
            .map(|o| o.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Listings: {}", config.listings.path);
    println!("  Output: {}", config.output.path);
    println!("  Formats: {}", config.output.formats.join(", "));
    println!("  Cache: {}", config.cache_directory());
    println!("  Concurrent Requests: {}", config.concurrent_requests());
    println!("  Dominance: {:?}", config.dominance_rule());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
