//! `lightnavi doctor` — Diagnose configuration and service health.

use lightnavi_config::AppConfig;
use lightnavi_core::RecommendationService;
use lightnavi_service::HttpRecommendationService;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("LightNavi Doctor — Diagnostics");
    println!("==============================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file — using defaults (run `lightnavi onboard`)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    println!("  Endpoint: {}", config.chat_url());
    println!("  Timeout:  {}s", config.service.timeout_secs);

    let service = HttpRecommendationService::from_config(&config)?;
    match service.health_check().await {
        Ok(true) => println!("  ✅ Recommendation service is healthy"),
        Ok(false) => {
            println!("  ⚠️  Service answered but reported unhealthy");
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ Service unreachable: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
