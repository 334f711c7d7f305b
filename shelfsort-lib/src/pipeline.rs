use shelfsort_catalog::{CatalogClient, PageProgress, TransportStats, fetch_all};
use shelfsort_core::{CancelToken, MediaCategory, OrderedItem, RawItem};

use crate::classify::{ClassificationStats, Classifier};
use crate::config::RunConfiguration;
use crate::error::ShelfError;
use crate::normalize::normalize;
use crate::price::{PriceProgress, PriceSummary, annotate};
use crate::sort::sort_items;

/// Progress notifications emitted while a run executes.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// About to resolve the token's username and read the first page.
    Fetching,
    PageFetched(PageProgress),
    Fetched { username: String, items: usize, pages: u32 },
    Classified(ClassificationStats),
    PriceLookup(PriceProgress),
    PricesDone(PriceSummary),
}

/// One category's items in shelf order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shelf {
    pub category: MediaCategory,
    pub items: Vec<OrderedItem>,
}

/// Classified, keyed and sorted items, before any price lookups.
#[derive(Debug, Clone)]
pub struct Arrangement {
    /// One shelf per enabled category, in output order.
    pub shelves: Vec<Shelf>,
    pub stats: ClassificationStats,
    /// Probable-mode rejections, in fetch order.
    pub probable_exclusions: Vec<RawItem>,
}

/// Classify, normalize and sort a fetched collection.
pub fn arrange(items: Vec<RawItem>, config: &RunConfiguration) -> Arrangement {
    let mut classifier = Classifier::new(config.classify().clone());
    let mut shelves: Vec<Shelf> = config
        .classify()
        .enabled()
        .into_iter()
        .map(|category| Shelf {
            category,
            items: Vec::new(),
        })
        .collect();

    for item in items {
        let category = classifier.classify(&item);
        let Some(shelf) = shelves.iter_mut().find(|s| s.category == category) else {
            continue;
        };
        let (artist_display, key) = normalize(&item, config.normalize());
        shelf.items.push(OrderedItem {
            item,
            category,
            key,
            artist_display,
            price: None,
        });
    }

    for shelf in &mut shelves {
        let items = std::mem::take(&mut shelf.items);
        shelf.items = sort_items(items, config.various());
    }

    let (stats, probable_exclusions) = classifier.into_parts();
    Arrangement {
        shelves,
        stats,
        probable_exclusions,
    }
}

/// Everything a run produced, ready for the writers.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub username: String,
    pub shelves: Vec<Shelf>,
    pub stats: ClassificationStats,
    pub probable_exclusions: Vec<RawItem>,
    /// Present when a value threshold was configured.
    pub prices: Option<PriceSummary>,
    pub transport: TransportStats,
}

impl RunOutput {
    pub fn shelf(&self, category: MediaCategory) -> Option<&Shelf> {
        self.shelves.iter().find(|s| s.category == category)
    }

    /// "LP: 12 • 45s: 3 • CDs: 40"
    pub fn summary_line(&self) -> String {
        self.shelves
            .iter()
            .map(|s| format!("{}: {}", s.category.summary_label(), s.items.len()))
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

/// A configured run bound to a catalog client.
pub struct Pipeline {
    config: RunConfiguration,
    client: CatalogClient,
}

impl Pipeline {
    pub fn new(config: RunConfiguration, client: CatalogClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    /// Fetch, classify, key, sort and optionally price the collection.
    ///
    /// Nothing is written here; a cancelled or failed run leaves no trace.
    pub fn run(
        mut self,
        cancel: &CancelToken,
        mut on_event: impl FnMut(RunEvent),
    ) -> Result<RunOutput, ShelfError> {
        self.config.validate()?;
        self.client.set_cancel(cancel.clone());

        on_event(RunEvent::Fetching);
        let collection = fetch_all(&mut self.client, self.config.fetch(), cancel, |p| {
            on_event(RunEvent::PageFetched(p.clone()))
        })?;
        log::info!(
            "Fetched {} items in {} pages for {}",
            collection.items.len(),
            collection.pages_fetched,
            collection.username
        );
        on_event(RunEvent::Fetched {
            username: collection.username.clone(),
            items: collection.items.len(),
            pages: collection.pages_fetched,
        });

        let mut arrangement = arrange(collection.items, &self.config);
        on_event(RunEvent::Classified(arrangement.stats.clone()));

        let prices = if self.config.price().threshold.is_some() {
            let items = arrangement
                .shelves
                .iter_mut()
                .flat_map(|s| s.items.iter_mut());
            let summary = annotate(
                &mut self.client,
                items,
                &self.config.price().currency,
                cancel,
                |p| on_event(RunEvent::PriceLookup(p)),
            )?;
            on_event(RunEvent::PricesDone(summary.clone()));
            Some(summary)
        } else {
            None
        };

        if cancel.is_cancelled() {
            return Err(ShelfError::Cancelled);
        }

        Ok(RunOutput {
            username: collection.username,
            shelves: arrangement.shelves,
            stats: arrangement.stats,
            probable_exclusions: arrangement.probable_exclusions,
            prices,
            transport: self.client.stats().clone(),
        })
    }
}
