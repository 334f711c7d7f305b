use super::*;
use shelfsort_core::{MediaCategory, RawItem, SortKey};

fn item(artist: &str, key: &str, title: &str, year: Option<u16>) -> OrderedItem {
    OrderedItem {
        item: RawItem::new(1, artist, title, year)
            .with_label("Label", "CAT 1")
            .with_country("UK"),
        category: MediaCategory::Lp,
        key: SortKey {
            artist: key.to_string(),
            title: title.to_string(),
            year,
            various: false,
        },
        artist_display: artist.to_string(),
        price: None,
    }
}

fn shelf() -> Vec<OrderedItem> {
    vec![
        item("10cc", "10cc", "Sheet Music", Some(1974)),
        item("The Beatles", "Beatles", "Abbey Road", Some(1969)),
        item("Blondie", "Blondie", "Parallel Lines", Some(1978)),
        item("Can", "Can", "Tago Mago", None),
    ]
}

#[test]
fn plain_line_layout() {
    let line = format_line(&shelf()[1], None, false);
    assert_eq!(line, "The Beatles — Abbey Road (1969) [Label CAT 1]");
}

#[test]
fn country_suffix_only_when_enabled() {
    let line = format_line(&shelf()[1], None, true);
    assert_eq!(line, "The Beatles — Abbey Road (1969) [Label CAT 1] {UK}");
}

#[test]
fn missing_year_and_label_are_omitted() {
    let mut bare = item("Can", "Can", "Tago Mago", None);
    bare.item.label.clear();
    bare.item.catno.clear();
    assert_eq!(format_line(&bare, None, true), "Can — Tago Mago {UK}");
}

#[test]
fn label_without_catno_has_no_trailing_space() {
    let mut it = shelf()[2].clone();
    it.item.catno.clear();
    assert_eq!(
        format_line(&it, None, false),
        "Blondie — Parallel Lines (1978) [Label]"
    );
}

#[test]
fn catno_without_label_has_no_leading_space() {
    let mut it = shelf()[2].clone();
    it.item.label.clear();
    assert_eq!(
        format_line(&it, None, false),
        "Blondie — Parallel Lines (1978) [CAT 1]"
    );
}

#[test]
fn dividers_group_by_artist_key() {
    let options = OutputOptions {
        dividers: true,
        ..Default::default()
    };
    let lines = render_lines(&shelf(), &options);
    assert_eq!(
        lines,
        vec![
            "=== # ===",
            "10cc — Sheet Music (1974) [Label CAT 1]",
            "=== B ===",
            "The Beatles — Abbey Road (1969) [Label CAT 1]",
            "Blondie — Parallel Lines (1978) [Label CAT 1]",
            "=== C ===",
            "Can — Tago Mago [Label CAT 1]",
        ]
    );
}

#[test]
fn aligned_columns_pad_by_characters() {
    let items = vec![
        item("Björk", "Björk", "Post", Some(1995)),
        item("The Beatles", "Beatles", "Abbey Road", Some(1969)),
    ];
    let options = OutputOptions {
        align: true,
        ..Default::default()
    };
    let lines = render_lines(&items, &options);
    assert_eq!(lines[0], "Björk       | Post       (1995) [Label CAT 1]");
    assert_eq!(lines[1], "The Beatles | Abbey Road (1969) [Label CAT 1]");
}

#[test]
fn text_file_ends_with_newline() {
    let bytes = TextFormat
        .render(&shelf()[..1], &OutputOptions::default())
        .unwrap();
    assert_eq!(bytes, b"10cc \xE2\x80\x94 Sheet Music (1974) [Label CAT 1]\n");
}
