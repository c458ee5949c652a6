//! Post command handler

use anyhow::{bail, Result};

use quotebook_core::{App, Quote, RemoteSource};

use crate::output::Output;

/// Send a quote to the remote server
///
/// The local collection is not changed.
pub async fn post<R: RemoteSource>(
    app: &App<R>,
    text: &str,
    category: &str,
    output: &Output,
) -> Result<()> {
    let (text, category) = (text.trim(), category.trim());
    if text.is_empty() || category.is_empty() {
        bail!("Please enter both a quote and a category.");
    }

    let ack = app.post_quote(&Quote::new(text, category)).await?;
    output.success("Quote posted to server");
    output.print_value(&ack);
    Ok(())
}
