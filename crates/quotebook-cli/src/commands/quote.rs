//! Quote command handlers

use anyhow::Result;

use quotebook_core::{App, Filter, Pick, RemoteSource};

use crate::output::Output;

/// Show a random quote
pub async fn show<R: RemoteSource>(
    app: &App<R>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    let pick = match category {
        Some(category) => app.show_random_in(&Filter::parse(&category)).await?,
        None => app.show_random().await?,
    };

    match pick {
        Pick::Quote(quote) => output.print_quote(&quote),
        Pick::NoQuotesAvailable => output.message("No quotes available for this category."),
    }

    Ok(())
}

/// Show the last quote displayed in this session
pub fn last<R: RemoteSource>(app: &App<R>, output: &Output) -> Result<()> {
    match app.last_viewed() {
        Some(quote) => output.print_quote(&quote),
        None => output.message("No quote shown yet this session."),
    }
    Ok(())
}

/// Add a quote
pub async fn add<R: RemoteSource>(
    app: &App<R>,
    text: &str,
    category: &str,
    output: &Output,
) -> Result<()> {
    let quote = app.add_quote(text, category).await?;
    output.success(&format!("Added quote to '{}'", quote.category));
    Ok(())
}

/// List quotes, optionally restricted to one category
pub async fn list<R: RemoteSource>(
    app: &App<R>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    let filter = category
        .as_deref()
        .map(Filter::parse)
        .unwrap_or(Filter::All);
    let quotes = app.quotes_in(&filter).await;
    output.print_quotes(&quotes);
    Ok(())
}
