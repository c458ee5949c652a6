//! Category command handlers

use anyhow::Result;

use quotebook_core::{App, RemoteSource};

use crate::output::{Output, OutputFormat};

/// List all categories
pub async fn list<R: RemoteSource>(app: &App<R>, output: &Output) -> Result<()> {
    let categories = app.categories().await;
    output.print_categories(&categories);
    Ok(())
}

/// Show the saved filter, or save a new one
///
/// Any value is accepted; a category no quote carries simply matches nothing.
pub async fn filter<R: RemoteSource>(
    app: &App<R>,
    value: Option<String>,
    output: &Output,
) -> Result<()> {
    let Some(value) = value else {
        let current = app.filter().await;
        match output.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "filter": current.as_str(),
                        "choices": app.category_choices().await,
                    })
                );
            }
            _ => println!("{}", current),
        }
        return Ok(());
    };

    let filter = app.set_filter(value.trim()).await?;
    output.success(&format!("Filter set to '{}'", filter));
    Ok(())
}
