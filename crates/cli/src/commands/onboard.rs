//! `lightnavi onboard` — First-time setup.

use lightnavi_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_path();

    println!("LightNavi — First-Time Setup");
    println!("============================\n");

    if AppConfig::write_default(&config_path)? {
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Set service.api_url to your recommendation backend");
        println!("   2. Run `lightnavi doctor` to check it is reachable");
        println!("   3. Run `lightnavi chat` to start describing a space\n");
    } else {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    }

    Ok(())
}
