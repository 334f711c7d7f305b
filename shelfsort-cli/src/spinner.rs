//! Progress spinner for a sort run.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use shelfsort_lib::RunEvent;

/// Spinner hidden when `quiet` is set.
pub(crate) fn spinner(quiet: bool, msg: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("/-\\|");
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Spinner text for a pipeline event, or `None` to leave it unchanged.
pub(crate) fn event_message(event: &RunEvent) -> Option<String> {
    match event {
        RunEvent::Fetching => Some("Connecting...".to_string()),
        RunEvent::PageFetched(p) => Some(match p.total_pages {
            Some(total) => format!(
                "Fetching page {}/{} ({} items)",
                p.page, total, p.items_so_far
            ),
            None => format!("Fetching page {} ({} items)", p.page, p.items_so_far),
        }),
        RunEvent::Fetched { items, .. } => Some(format!("Classifying {} items...", items)),
        RunEvent::Classified(_) => Some("Sorting...".to_string()),
        RunEvent::PriceLookup(p) => Some(format!("Looking up prices {}/{}", p.done, p.total)),
        RunEvent::PricesDone(_) => None,
    }
}
