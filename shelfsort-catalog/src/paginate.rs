use shelfsort_core::{CancelToken, RawItem};

use crate::client::CatalogClient;
use crate::error::CatalogError;

/// Which folder to read and how to page through it.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// `0` is the catalog's "All" folder.
    pub folder_id: u64,
    pub per_page: u32,
    /// Stop after this many pages even if more remain.
    pub max_pages: Option<u32>,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            folder_id: 0,
            per_page: 100,
            max_pages: None,
        }
    }
}

/// Progress report emitted after each page is received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageProgress {
    pub page: u32,
    pub items_on_page: usize,
    /// Total pages as reported by pagination metadata, if any.
    pub total_pages: Option<u32>,
    pub items_so_far: usize,
}

/// A complete collection in server order.
#[derive(Debug, Clone)]
pub struct Collection {
    pub username: String,
    pub items: Vec<RawItem>,
    pub pages_fetched: u32,
}

/// Fetch every page of a collection folder.
///
/// Pages are requested sequentially and concatenated in server order. The
/// walk ends on a short page, on the last page reported by the pagination
/// metadata, or at `max_pages`. Any failed page fails the whole fetch.
pub fn fetch_all(
    client: &mut CatalogClient,
    request: &FetchRequest,
    cancel: &CancelToken,
    mut on_page: impl FnMut(&PageProgress),
) -> Result<Collection, CatalogError> {
    if cancel.is_cancelled() {
        return Err(CatalogError::Cancelled);
    }
    let username = client.identity()?.username;
    log::debug!("Authenticated as {}", username);

    let per_page = request.per_page.max(1);
    let mut items = Vec::new();
    let mut page = 1u32;

    loop {
        if cancel.is_cancelled() {
            return Err(CatalogError::Cancelled);
        }

        let body = client.collection_page(&username, request.folder_id, page, per_page)?;
        let total_pages = body.pagination.as_ref().map(|p| p.pages).filter(|&p| p > 0);
        let count = body.releases.len();
        items.extend(body.releases.into_iter().map(|r| r.into_raw_item()));

        log::debug!(
            "Page {}/{}: {} items",
            page,
            total_pages.map_or_else(|| "?".to_string(), |p| p.to_string()),
            count
        );
        on_page(&PageProgress {
            page,
            items_on_page: count,
            total_pages,
            items_so_far: items.len(),
        });

        let short_page = count < per_page as usize;
        let last_reported = total_pages.is_some_and(|total| page >= total);
        let hit_cap = request.max_pages.is_some_and(|max| page >= max);
        if short_page || last_reported || hit_cap {
            break;
        }
        page += 1;
    }

    Ok(Collection {
        username,
        items,
        pages_fetched: page,
    })
}
