use std::collections::HashMap;

use shelfsort_catalog::CatalogClient;
use shelfsort_core::{CancelToken, OrderedItem, Price};

use crate::error::ShelfError;

/// Outcome of a price lookup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceSummary {
    /// Distinct releases requested from the marketplace.
    pub lookups: usize,
    /// Items that received a price.
    pub priced: usize,
    /// Items left without a price (nothing for sale, lookup failed, no id).
    pub unknown: usize,
    /// Lookups that failed outright and were recorded as unknown.
    pub failures: usize,
}

impl PriceSummary {
    /// Some items have no price, so a value report may be incomplete.
    pub fn is_partial(&self) -> bool {
        self.unknown > 0
    }
}

/// Progress of a price pass: `done` of `total` items handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceProgress {
    pub done: usize,
    pub total: usize,
}

/// Look up the lowest marketplace price for each item, one request per
/// distinct release.
///
/// Missing prices and per-item failures leave the item unpriced. A rejected
/// credential aborts the pass since every later lookup would fail the same
/// way.
pub fn annotate<'a>(
    client: &mut CatalogClient,
    items: impl IntoIterator<Item = &'a mut OrderedItem>,
    currency: &str,
    cancel: &CancelToken,
    mut on_progress: impl FnMut(PriceProgress),
) -> Result<PriceSummary, ShelfError> {
    let mut items: Vec<&mut OrderedItem> = items.into_iter().collect();
    let total = items.len();
    let mut cache: HashMap<u64, Option<Price>> = HashMap::new();
    let mut summary = PriceSummary::default();

    for (i, item) in items.iter_mut().enumerate() {
        if cancel.is_cancelled() {
            return Err(ShelfError::Cancelled);
        }

        let release_id = item.item.release_id;
        item.price = if release_id == 0 {
            None
        } else if let Some(cached) = cache.get(&release_id) {
            cached.clone()
        } else {
            summary.lookups += 1;
            let price = match client.release_price(release_id, currency) {
                Ok(price) => price,
                Err(e) if e.is_auth() => return Err(e.into()),
                Err(e) => {
                    log::warn!("Price lookup failed for release {}: {}", release_id, e);
                    summary.failures += 1;
                    None
                }
            };
            cache.insert(release_id, price.clone());
            price
        };

        if item.price.is_some() {
            summary.priced += 1;
        } else {
            summary.unknown += 1;
        }
        on_progress(PriceProgress { done: i + 1, total });
    }

    if summary.is_partial() {
        log::warn!(
            "{} of {} items have no known price",
            summary.unknown,
            total
        );
    }
    Ok(summary)
}

/// Whether an item's known price is strictly above `threshold_minor`.
pub fn exceeds_threshold(item: &OrderedItem, threshold_minor: u64) -> bool {
    item.price
        .as_ref()
        .is_some_and(|p| p.minor_units > threshold_minor)
}
