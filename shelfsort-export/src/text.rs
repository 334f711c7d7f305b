//! Plain-text shelf lists.
//!
//! ```text
//! === B ===
//! The Beatles — Abbey Road (1969) [Apple Records PCS 7088] {UK}
//! ```
//! With alignment the artist and title columns are padded to the widest
//! entry and separated by ` | `.

use shelfsort_core::OrderedItem;
use shelfsort_lib::OutputOptions;

use crate::ShelfFormat;
use crate::error::ExportError;

/// Column widths for aligned output; zero when alignment is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct Widths {
    pub artist: usize,
    pub title: usize,
}

impl Widths {
    pub fn measure(items: &[OrderedItem]) -> Self {
        Self {
            artist: items
                .iter()
                .map(|i| i.artist_display.chars().count())
                .max()
                .unwrap_or(0),
            title: items
                .iter()
                .map(|i| i.title().chars().count())
                .max()
                .unwrap_or(0),
        }
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut out = text.to_string();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    out
}

/// One shelf line. `widths` is only consulted when aligning.
pub fn format_line(item: &OrderedItem, widths: Option<Widths>, show_country: bool) -> String {
    let raw = &item.item;
    let mut line = match widths {
        Some(w) => format!(
            "{} | {}",
            pad(&item.artist_display, w.artist),
            pad(item.title(), w.title)
        ),
        None => format!("{} — {}", item.artist_display, item.title()),
    };
    if let Some(year) = item.year() {
        line.push_str(&format!(" ({year})"));
    }
    let label_parts: Vec<&str> = [raw.label.trim(), raw.catno.trim()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();
    if !label_parts.is_empty() {
        line.push_str(&format!(" [{}]", label_parts.join(" ")));
    }
    if show_country && !raw.country.is_empty() {
        line.push_str(&format!(" {{{}}}", raw.country));
    }
    line.trim_end().to_string()
}

/// Divider letter for an item: the first letter of its artist key, or `#`.
fn divider_letter(item: &OrderedItem) -> String {
    match item.key.artist.trim().chars().next() {
        Some(c) if c.is_alphabetic() => c.to_uppercase().collect(),
        _ => "#".to_string(),
    }
}

/// Every line of a text shelf file, dividers included.
pub fn render_lines(items: &[OrderedItem], options: &OutputOptions) -> Vec<String> {
    let widths = options.align.then(|| Widths::measure(items));
    let mut lines = Vec::with_capacity(items.len());
    let mut current: Option<String> = None;

    for item in items {
        if options.dividers {
            let letter = divider_letter(item);
            if current.as_deref() != Some(letter.as_str()) {
                lines.push(format!("=== {letter} ==="));
                current = Some(letter);
            }
        }
        lines.push(format_line(item, widths, options.show_country));
    }
    lines
}

/// `<stem>_shelf_order.txt`
pub struct TextFormat;

impl ShelfFormat for TextFormat {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, items: &[OrderedItem], options: &OutputOptions) -> Result<Vec<u8>, ExportError> {
        let mut out = String::new();
        for line in render_lines(items, options) {
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
#[path = "tests/text_tests.rs"]
mod tests;
