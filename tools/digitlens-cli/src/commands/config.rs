//! Show the effective configuration.

use digitlens_common::AppConfig;

pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::load();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
