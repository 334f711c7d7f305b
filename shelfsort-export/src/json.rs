use serde::Serialize;

use shelfsort_core::OrderedItem;
use shelfsort_lib::{OutputOptions, Shelf};

use crate::ShelfFormat;
use crate::error::ExportError;

/// One item as written to JSON.
#[derive(Debug, Serialize)]
pub struct JsonRecord<'a> {
    /// Only set in the combined all-media file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<&'static str>,
    pub artist: &'a str,
    pub title: &'a str,
    pub year: Option<u16>,
    pub label: &'a str,
    pub catno: &'a str,
    pub country: &'a str,
    pub format: String,
    pub discogs_url: String,
    pub notes: &'a str,
    pub sort_artist: &'a str,
    pub sort_title: &'a str,
}

impl<'a> JsonRecord<'a> {
    pub fn new(item: &'a OrderedItem) -> Self {
        let raw = &item.item;
        Self {
            media_type: None,
            artist: &item.artist_display,
            title: &raw.title,
            year: raw.year,
            label: &raw.label,
            catno: &raw.catno,
            country: &raw.country,
            format: raw.format_summary(),
            discogs_url: raw.release_url(),
            notes: &raw.notes,
            sort_artist: &item.key.artist,
            sort_title: &item.key.title,
        }
    }

    pub fn tagged(item: &'a OrderedItem) -> Self {
        Self {
            media_type: Some(item.category.media_tag()),
            ..Self::new(item)
        }
    }
}

fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, ExportError> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// `<stem>_shelf_order.json`
pub struct JsonFormat;

impl ShelfFormat for JsonFormat {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, items: &[OrderedItem], _options: &OutputOptions) -> Result<Vec<u8>, ExportError> {
        let records: Vec<JsonRecord> = items.iter().map(JsonRecord::new).collect();
        to_bytes(&records)
    }
}

/// Union of all shelves in category order, each record tagged with its
/// `media_type`.
pub fn render_combined(shelves: &[Shelf]) -> Result<Vec<u8>, ExportError> {
    let records: Vec<JsonRecord> = shelves
        .iter()
        .flat_map(|s| s.items.iter())
        .map(JsonRecord::tagged)
        .collect();
    to_bytes(&records)
}
