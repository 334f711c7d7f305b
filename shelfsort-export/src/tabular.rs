use shelfsort_core::OrderedItem;
use shelfsort_lib::OutputOptions;

use crate::ShelfFormat;
use crate::error::ExportError;

/// `<stem>_shelf_order.csv`: header row plus one row per item. The Country
/// column is present only when country display is on.
pub struct CsvFormat;

fn header(show_country: bool) -> Vec<&'static str> {
    let mut cols = vec!["Artist", "Title", "Year", "Label", "CatNo"];
    if show_country {
        cols.push("Country");
    }
    cols.extend(["Format", "Media", "DiscogsURL", "Notes"]);
    cols
}

fn row(item: &OrderedItem, show_country: bool) -> Vec<String> {
    let raw = &item.item;
    let mut fields = vec![
        item.artist_display.clone(),
        raw.title.clone(),
        item.year().map(|y| y.to_string()).unwrap_or_default(),
        raw.label.clone(),
        raw.catno.clone(),
    ];
    if show_country {
        fields.push(raw.country.clone());
    }
    fields.extend([
        raw.format_summary(),
        item.category.media_tag().to_string(),
        raw.release_url(),
        raw.notes.clone(),
    ]);
    fields
}

impl ShelfFormat for CsvFormat {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, items: &[OrderedItem], options: &OutputOptions) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(header(options.show_country))?;
        for item in items {
            writer.write_record(row(item, options.show_country))?;
        }
        writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}
