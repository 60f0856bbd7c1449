//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `listings_core` linkage, config loading, and storage bootstrap.
//! - Print a deterministic store summary for quick local sanity checks.
//!
//! Usage: `listings_cli [config.json]`

use listings_core::{
    init_logging_from_config, open_db_with_config, Listings, ListingsConfig, ListingsError,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("listings_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => ListingsConfig::load(path)?,
        None => ListingsConfig::default(),
    }
    .with_env_overrides()?;

    let logging = init_logging_from_config(&config)?;
    let conn = open_db_with_config(&config)?;
    let listings = Listings::try_new(&conn)?;

    println!("listings_core ping={}", listings_core::ping());
    println!("listings_core version={}", listings_core::core_version());
    println!(
        "store={}",
        config
            .database_path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string())
    );
    println!("logging={}", if logging { "on" } else { "off" });
    print_summary(&listings)?;

    info!("event=cli_summary module=cli status=ok");
    Ok(())
}

fn print_summary(listings: &Listings<'_>) -> Result<(), ListingsError> {
    println!("areas={}", listings.venues.venues_by_area()?.len());
    println!("venues={}", listings.venues.count_venues()?);
    println!("artists={}", listings.artists.count_artists()?);
    println!("shows={}", listings.shows.count_shows()?);
    Ok(())
}
