use shelfsort_core::{OrderedItem, RawItem};
use shelfsort_lib::normalize::display_artist;
use shelfsort_lib::{OutputOptions, Shelf, exceeds_threshold};

use crate::text::format_line;

pub const PROBABLE_REPORT_FILE: &str = "excluded_probable_lp.txt";

/// Threshold as written in file names and headers: `50`, `12.5`.
pub fn threshold_label(threshold: f64) -> String {
    if threshold.fract() == 0.0 {
        format!("{}", threshold as u64)
    } else {
        format!("{threshold}")
    }
}

pub fn valuable_file_name(threshold: f64) -> String {
    format!("valuable_over_{}.txt", threshold_label(threshold))
}

/// Every shelved item priced strictly above `threshold`, in shelf order.
pub fn valuable_items(shelves: &[Shelf], threshold_minor: u64) -> Vec<&OrderedItem> {
    shelves
        .iter()
        .flat_map(|s| s.items.iter())
        .filter(|item| exceeds_threshold(item, threshold_minor))
        .collect()
}

pub fn render_valuable(
    shelves: &[Shelf],
    threshold: f64,
    currency: &str,
    options: &OutputOptions,
) -> Vec<u8> {
    let threshold_minor = (threshold * 100.0).round() as u64;
    let mut out = format!(
        "=== Valuable items over {} {} ===\n",
        threshold_label(threshold),
        currency
    );
    for item in valuable_items(shelves, threshold_minor) {
        let line = format_line(item, None, options.show_country);
        match &item.price {
            Some(price) => out.push_str(&format!(
                "{line} [~{} {}]\n",
                price.major_rounded(),
                price.currency
            )),
            None => out.push_str(&format!("{line}\n")),
        }
    }
    out.into_bytes()
}

fn vinyl_qualifiers(item: &RawItem) -> String {
    item.formats
        .iter()
        .filter(|f| f.is_named("vinyl"))
        .flat_map(|f| f.descriptions.iter())
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_probable_exclusions(items: &[RawItem]) -> Vec<u8> {
    let mut out =
        String::from("=== LPs excluded in probable 33 mode (explicit 45/78 descriptors) ===\n");
    for item in items {
        out.push_str(&format!(
            "{} — {} | descriptors: {}\n",
            display_artist(&item.artists),
            item.title,
            vinyl_qualifiers(item)
        ));
    }
    out.into_bytes()
}
