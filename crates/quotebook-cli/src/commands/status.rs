//! Status command handler

use anyhow::Result;

use quotebook_core::{App, Config, RemoteSource};

use crate::output::{Output, OutputFormat};

/// Show status information
pub async fn show<R: RemoteSource>(app: &App<R>, config: &Config, output: &Output) -> Result<()> {
    let quotes = app.quotes().await.len();
    let categories = app.categories().await.len();
    let filter = app.filter().await;
    let last = app.last_viewed();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "sync_enabled": config.sync_enabled,
                    "sync_url": config.sync_url,
                    "sync_interval_secs": config.sync_interval().as_secs(),
                    "data_dir": config.data_dir,
                    "counts": {
                        "quotes": quotes,
                        "categories": categories
                    },
                    "filter": filter.as_str(),
                    "last_viewed": last
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", quotes);
        }
        OutputFormat::Human => {
            println!("Quotebook Status");
            println!("================");
            println!();
            println!("Sync:");
            println!(
                "  Auto-sync: {}",
                if config.sync_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            println!("  Server:    {}", config.sync_url);
            println!("  Interval:  {}s", config.sync_interval().as_secs());
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!();
            println!("Contents:");
            println!("  Quotes:     {}", quotes);
            println!("  Categories: {}", categories);
            println!("  Filter:     {}", filter);
            if let Some(quote) = last {
                println!("  Last shown: {}", quote);
            }
        }
    }

    Ok(())
}
