//! Sync command handlers

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use quotebook_core::{
    App, ConflictRecord, Error, RemoteSource, Resolution, ResolveOutcome, SyncEvent,
};

use crate::output::Output;
use crate::KeepChoice;

/// Sync once, then settle the conflicts it raised
pub async fn sync<R: RemoteSource>(app: &App<R>, keep: KeepChoice, output: &Output) -> Result<()> {
    output.message(quotebook_core::sync::MSG_SYNCING);

    let report = match app.sync().await {
        Ok(report) => report,
        Err(e) => {
            output.message(quotebook_core::sync::MSG_FAILED);
            return Err(e.into());
        }
    };

    output.success(quotebook_core::sync::MSG_SYNCED);
    output.print_report(&report);

    for conflict in report.conflicts {
        settle(app, conflict, keep, output).await?;
    }

    Ok(())
}

/// Sync on a timer until Ctrl-C
pub async fn watch<R: RemoteSource>(
    app: &App<R>,
    interval: Duration,
    keep: KeepChoice,
    output: &Output,
) -> Result<()> {
    let mut events = app.engine().subscribe_events();
    app.set_auto_sync(true, interval);
    output.message(&format!(
        "Syncing every {}s. Press Ctrl-C to stop.",
        interval.as_secs()
    ));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(SyncEvent::Message(msg)) => output.message(&msg),
                Ok(SyncEvent::ConflictRaised(conflict)) => {
                    settle(app, conflict, keep, output).await?;
                }
                Ok(SyncEvent::Error(e)) => output.message(&format!("  {}", e)),
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    warn!("Watch fell behind by {} events", missed);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    app.set_auto_sync(false, interval);
    output.message("Stopped.");
    Ok(())
}

/// Sync silently before read commands; conflicts keep the local quote
pub async fn auto_sync<R: RemoteSource>(app: &App<R>, output: &Output) {
    match app.sync().await {
        Ok(report) => {
            if !report.conflicts.is_empty() {
                if let Err(e) = app.resolve_all(Resolution::KeepLocal).await {
                    warn!("Could not settle auto-sync conflicts: {}", e);
                }
            }
        }
        Err(e) => {
            if !output.is_quiet() {
                eprintln!("⚠ Auto-sync failed: {}", e);
            }
        }
    }
}

async fn settle<R: RemoteSource>(
    app: &App<R>,
    conflict: ConflictRecord,
    keep: KeepChoice,
    output: &Output,
) -> Result<()> {
    if conflict.differs() {
        output.print_conflict(&conflict);
    }

    let resolution = match decide(&conflict, keep, output.should_prompt()) {
        Some(resolution) => resolution,
        None => {
            let prompt_for = conflict.clone();
            tokio::task::spawn_blocking(move || prompt_resolution(&prompt_for)).await??
        }
    };

    let outcome = match app.resolve(conflict.id, resolution).await {
        Ok(outcome) => outcome,
        // Settled elsewhere while we were asking
        Err(Error::ConflictNotFound(_)) => {
            if conflict.differs() {
                output.message("  Already settled.");
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if !conflict.differs() {
        return Ok(());
    }
    match outcome {
        ResolveOutcome::KeptLocal => output.message("  Kept local quote."),
        ResolveOutcome::Replaced { .. } => output.message("  Took server quote."),
        ResolveOutcome::Stale => output.message("  Local quote is gone; nothing to replace."),
    }
    Ok(())
}

/// The resolution to apply without asking, or `None` to prompt
///
/// Identical pairs are always kept local since both sides agree.
fn decide(conflict: &ConflictRecord, keep: KeepChoice, can_prompt: bool) -> Option<Resolution> {
    if !conflict.differs() {
        return Some(Resolution::KeepLocal);
    }
    match keep.resolution() {
        Some(resolution) => Some(resolution),
        // Prompts need a human on the other end
        None if !can_prompt => Some(Resolution::KeepLocal),
        None => None,
    }
}

fn prompt_resolution(conflict: &ConflictRecord) -> io::Result<Resolution> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    read_resolution(conflict, &mut input, &mut stdout)
}

/// Ask until the answer is `l` or `s`
fn read_resolution(
    conflict: &ConflictRecord,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<Resolution> {
    loop {
        write!(
            out,
            "Keep [l]ocal \"{}\" or [s]erver \"{}\"? ",
            conflict.local.category, conflict.server.category
        )?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF keeps what we have
            return Ok(Resolution::KeepLocal);
        }

        match parse_choice(&line) {
            Some(resolution) => return Ok(resolution),
            None => writeln!(out, "Please answer 'l' or 's'.")?,
        }
    }
}

fn parse_choice(input: &str) -> Option<Resolution> {
    match input.trim().to_ascii_lowercase().as_str() {
        "l" | "local" => Some(Resolution::KeepLocal),
        "s" | "server" => Some(Resolution::KeepServer),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::output::OutputFormat;
    use quotebook_core::models::default_quotes;
    use quotebook_core::{MemoryStore, Quote};

    /// Remote that always serves the same quotes
    struct FixedRemote(Vec<Quote>);

    impl RemoteSource for FixedRemote {
        async fn fetch_quotes(&self) -> quotebook_core::Result<Vec<Quote>> {
            Ok(self.0.clone())
        }

        async fn post_quote(&self, quote: &Quote) -> quotebook_core::Result<serde_json::Value> {
            Ok(serde_json::json!({"text": quote.text, "category": quote.category}))
        }
    }

    fn app_serving(remote: Vec<Quote>) -> App<FixedRemote> {
        App::with_parts(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            FixedRemote(remote),
            false,
        )
    }

    fn conflict() -> ConflictRecord {
        ConflictRecord::new(Quote::new("A", "X"), Quote::new("A", "Y"), 0)
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("l\n"), Some(Resolution::KeepLocal));
        assert_eq!(parse_choice(" Server "), Some(Resolution::KeepServer));
        assert_eq!(parse_choice("maybe"), None);
    }

    #[test]
    fn test_read_resolution_retries() {
        let mut input = io::Cursor::new("what\ns\n");
        let mut out = Vec::new();
        let resolution = read_resolution(&conflict(), &mut input, &mut out).unwrap();
        assert_eq!(resolution, Resolution::KeepServer);

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Please answer"));
        assert!(printed.contains("[s]erver \"Y\""));
    }

    #[test]
    fn test_read_resolution_eof_keeps_local() {
        let mut input = io::Cursor::new("");
        let mut out = Vec::new();
        let resolution = read_resolution(&conflict(), &mut input, &mut out).unwrap();
        assert_eq!(resolution, Resolution::KeepLocal);
    }

    #[test]
    fn test_decide_skips_identical_pairs() {
        let same = ConflictRecord::new(Quote::new("A", "Server"), Quote::new("A", "Server"), 0);
        assert_eq!(
            decide(&same, KeepChoice::Ask, true),
            Some(Resolution::KeepLocal)
        );
        assert_eq!(
            decide(&same, KeepChoice::Server, true),
            Some(Resolution::KeepLocal)
        );
    }

    #[test]
    fn test_decide_differing_pairs() {
        assert_eq!(decide(&conflict(), KeepChoice::Ask, true), None);
        assert_eq!(
            decide(&conflict(), KeepChoice::Ask, false),
            Some(Resolution::KeepLocal)
        );
        assert_eq!(
            decide(&conflict(), KeepChoice::Server, true),
            Some(Resolution::KeepServer)
        );
    }

    #[tokio::test]
    async fn test_settle_identical_pair_clears_it_without_asking() {
        let app = app_serving(vec![default_quotes()[0].clone()]);
        let report = app.sync().await.unwrap();
        assert_eq!(report.conflicts.len(), 1);

        let output = Output::new(OutputFormat::Human);
        settle(&app, report.conflicts[0].clone(), KeepChoice::Ask, &output)
            .await
            .unwrap();

        assert!(app.pending_conflicts().await.is_empty());
        assert_eq!(app.quotes().await, default_quotes());
    }

    #[tokio::test]
    async fn test_settle_tolerates_already_settled_conflict() {
        let local = default_quotes()[0].clone();
        let app = app_serving(vec![Quote::new(local.text.clone(), "Remote")]);
        let conflict = app.sync().await.unwrap().conflicts[0].clone();

        app.resolve(conflict.id, Resolution::KeepLocal).await.unwrap();

        let output = Output::new(OutputFormat::Quiet);
        settle(&app, conflict, KeepChoice::Server, &output)
            .await
            .unwrap();
        assert_eq!(app.quotes().await[0], local);
    }

    #[tokio::test]
    async fn test_auto_sync_settles_conflicts_keeping_local() {
        let local = default_quotes()[0].clone();
        let app = app_serving(vec![
            Quote::new(local.text.clone(), "Remote"),
            Quote::new("Fresh", "Server"),
        ]);

        auto_sync(&app, &Output::new(OutputFormat::Quiet)).await;

        assert!(app.pending_conflicts().await.is_empty());
        let quotes = app.quotes().await;
        assert_eq!(quotes[0], local);
        assert_eq!(quotes.last(), Some(&Quote::new("Fresh", "Server")));
    }
}
