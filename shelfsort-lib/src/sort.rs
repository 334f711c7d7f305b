use std::cmp::Ordering;

use shelfsort_core::OrderedItem;

use crate::config::VariousPolicy;

/// Compare two strings ignoring case (full Unicode lowercasing).
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

fn various_rank(item: &OrderedItem, policy: VariousPolicy) -> u8 {
    match (policy, item.key.various) {
        (VariousPolicy::First, false) => 1,
        (VariousPolicy::Last, true) => 1,
        _ => 0,
    }
}

fn primary_key(item: &OrderedItem, policy: VariousPolicy) -> &str {
    if policy == VariousPolicy::Title && item.key.various {
        &item.key.title
    } else {
        &item.key.artist
    }
}

/// Absent years sort after every known year.
fn cmp_year(a: Option<u16>, b: Option<u16>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Shelf comparator: various-artists rank, artist, title, year.
pub fn compare(a: &OrderedItem, b: &OrderedItem, policy: VariousPolicy) -> Ordering {
    various_rank(a, policy)
        .cmp(&various_rank(b, policy))
        .then_with(|| cmp_ignore_case(primary_key(a, policy), primary_key(b, policy)))
        .then_with(|| cmp_ignore_case(&a.key.title, &b.key.title))
        .then_with(|| cmp_year(a.key.year, b.key.year))
}

/// Stable sort into shelf order. Items that compare equal keep the order
/// they were fetched in.
pub fn sort_items(mut items: Vec<OrderedItem>, policy: VariousPolicy) -> Vec<OrderedItem> {
    items.sort_by(|a, b| compare(a, b, policy));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfsort_core::{MediaCategory, RawItem, SortKey};

    fn item(id: u64, artist: &str, title: &str, year: Option<u16>, various: bool) -> OrderedItem {
        OrderedItem {
            item: RawItem::new(id, artist, title, year),
            category: MediaCategory::Lp,
            key: SortKey {
                artist: artist.to_string(),
                title: title.to_string(),
                year,
                various,
            },
            artist_display: artist.to_string(),
            price: None,
        }
    }

    fn ids(items: &[OrderedItem]) -> Vec<u64> {
        items.iter().map(|i| i.item.release_id).collect()
    }

    #[test]
    fn artist_then_title_then_year() {
        let items = vec![
            item(1, "beatles", "Let It Be", Some(1970), false),
            item(2, "Beatles", "Abbey Road", Some(1969), false),
            item(3, "Abba", "Arrival", Some(1976), false),
            item(4, "beatles", "abbey road", Some(1968), false),
        ];
        assert_eq!(ids(&sort_items(items, VariousPolicy::Normal)), vec![3, 4, 2, 1]);
    }

    #[test]
    fn unknown_year_sorts_last() {
        let items = vec![
            item(1, "Can", "Tago Mago", None, false),
            item(2, "Can", "Tago Mago", Some(1971), false),
        ];
        assert_eq!(ids(&sort_items(items, VariousPolicy::Normal)), vec![2, 1]);
    }

    #[test]
    fn ties_keep_fetch_order_and_sorting_is_repeatable() {
        let items = vec![
            item(5, "Can", "Ege Bamyasi", Some(1972), false),
            item(2, "Can", "Ege Bamyasi", Some(1972), false),
            item(9, "Can", "Ege Bamyasi", Some(1972), false),
        ];
        let once = sort_items(items, VariousPolicy::Normal);
        assert_eq!(ids(&once), vec![5, 2, 9]);
        let twice = sort_items(once.clone(), VariousPolicy::Normal);
        assert_eq!(once, twice);
    }

    #[test]
    fn various_policies() {
        let items = || {
            vec![
                item(1, "Various", "Zebra Songs", Some(2000), true),
                item(2, "Zappa", "Hot Rats", Some(1969), false),
                item(3, "Abba", "Arrival", Some(1976), false),
                item(4, "Various", "Alpha Tunes", Some(1999), true),
            ]
        };
        assert_eq!(ids(&sort_items(items(), VariousPolicy::Normal)), vec![3, 4, 1, 2]);
        assert_eq!(ids(&sort_items(items(), VariousPolicy::First)), vec![4, 1, 3, 2]);
        assert_eq!(ids(&sort_items(items(), VariousPolicy::Last)), vec![3, 2, 4, 1]);
        assert_eq!(ids(&sort_items(items(), VariousPolicy::Title)), vec![3, 4, 2, 1]);
    }

    #[test]
    fn case_insensitive_compare_handles_unicode() {
        assert_eq!(cmp_ignore_case("ÉTÉ", "été"), Ordering::Equal);
        assert_eq!(cmp_ignore_case("abc", "ABD"), Ordering::Less);
    }
}
