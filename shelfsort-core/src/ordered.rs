use crate::item::{Price, RawItem};
use crate::media::MediaCategory;

/// Keys derived from an item that decide its shelf position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Artist key: suffix-stripped, article-stripped, possibly "Last, First".
    pub artist: String,
    /// Title key: article-stripped.
    pub title: String,
    /// `None` sorts after every known year.
    pub year: Option<u16>,
    /// The item is a "Various Artists" compilation.
    pub various: bool,
}

/// A classified, keyed item ready for sorting and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedItem {
    pub item: RawItem,
    pub category: MediaCategory,
    pub key: SortKey,
    /// Artist line as printed (credits joined, numeric suffixes removed).
    pub artist_display: String,
    /// Lowest marketplace price, when looked up and known.
    pub price: Option<Price>,
}

impl OrderedItem {
    pub fn title(&self) -> &str {
        &self.item.title
    }

    pub fn year(&self) -> Option<u16> {
        self.item.year
    }
}
