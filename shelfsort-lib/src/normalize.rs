//! Artist and title normalization for shelf keys.
//!
//! Catalog artist names carry a few conventions that get in the way of
//! alphabetical filing:
//! ```text
//! Santana (2)          numeric disambiguator
//! The Beatles          leading article
//! Simon & Garfunkel    multiple credits joined by the catalog
//! ```
//! This module turns them into a display string and a `SortKey`, and can
//! optionally file personal names surname first ("Bowie, David").

use shelfsort_core::{ArtistCredit, RawItem, SortKey};

use crate::config::NormalizeOptions;

const BASE_ARTICLES: &[&str] = &["the", "a", "an"];

const VARIOUS_NAMES: &[&str] = &["various", "various artists"];

/// Words that never start or end a personal name.
const CONJUNCTIONS: &[&str] = &["and", "&", "+", "with", "of"];

const BAND_ADJECTIVES: &[&str] = &[
    "big", "small", "little", "bad", "good", "great", "new", "old", "young", "black", "white",
    "blue", "red", "green", "wild", "sweet",
];

const BAND_TERMS: &[&str] = &[
    "band", "trio", "quartet", "quintet", "sextet", "septet", "octet", "nonet", "orchestra",
    "ensemble", "choir", "chorale", "collective", "project", "group", "crew", "players",
    "brothers", "sisters", "family", "experience",
];

/// Given names that end in "s" or follow an adjective-like word without
/// making the name a band ("Miles Davis", "Little Richard").
const COMMON_FIRST_NAMES: &[&str] = &[
    "john", "james", "michael", "robert", "david", "william", "richard", "thomas", "charles",
    "joseph", "christopher", "daniel", "paul", "mark", "donald", "george", "kenneth", "steven",
    "edward", "brian", "ronald", "anthony", "kevin", "jason", "matthew", "gary", "timothy",
    "jose", "larry", "jeffrey", "frank", "scott", "eric", "stephen", "andrew", "raymond",
    "gregory", "joshua", "jerry", "dennis", "walter", "patrick", "peter", "harold", "douglas",
    "henry", "carl", "arthur", "ryan", "roger", "joe", "juan", "jack", "albert", "jonathan",
    "justin", "terry", "gerald", "keith", "samuel", "willie", "ralph", "lawrence", "nicholas",
    "roy", "benjamin", "bruce", "brandon", "adam", "harry", "fred", "wayne", "billy", "steve",
    "louis", "jeremy", "aaron", "randy", "howard", "eugene", "carlos", "russell", "bobby",
    "victor", "martin", "ernest", "phillip", "todd", "jesse", "craig", "alan", "shawn",
    "clarence", "sean", "philip", "chris", "johnny", "earl", "jimmy", "antonio", "danny",
    "bryan", "tony", "luis", "miles", "neil", "nick", "lou", "chuck", "ian", "alex", "noel",
];

const SURNAME_PARTICLES: &[&str] = &[
    "de", "del", "van", "von", "da", "di", "la", "le", "du", "do", "dos", "das", "st",
];

/// Middle names common enough in performer names to allow a three-word flip.
const COMMON_MIDDLE_NAMES: &[&str] = &[
    "lee", "ray", "lou", "mae", "ann", "anne", "jo", "lynn", "marie", "earl", "allen", "wayne",
];

/// Replace typographic apostrophes with a plain one.
pub fn normalize_apostrophes(text: &str) -> String {
    text.replace(['\u{2019}', '\u{2018}', '\u{02BC}'], "'")
}

/// Remove a trailing " (n)" disambiguator: "Santana (2)" -> "Santana".
pub fn strip_numeric_suffix(name: &str) -> &str {
    let trimmed = name.trim();
    let Some(body) = trimmed.strip_suffix(')') else {
        return trimmed;
    };
    let Some(open) = body.rfind('(') else {
        return trimmed;
    };
    let digits = &body[open + 1..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return trimmed;
    }
    body[..open].trim_end()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Printed artist line: credit names without disambiguators, joined the way
/// the catalog joins them.
pub fn display_artist(credits: &[ArtistCredit]) -> String {
    let mut out = String::new();
    for (i, credit) in credits.iter().enumerate() {
        out.push_str(strip_numeric_suffix(&credit.name));
        if i + 1 == credits.len() {
            break;
        }
        let join = credit.join.trim();
        match join {
            "" => out.push_str(", "),
            j if j.starts_with(',') => {
                out.push_str(j);
                out.push(' ');
            }
            j => {
                out.push(' ');
                out.push_str(j);
                out.push(' ');
            }
        }
    }
    collapse_whitespace(&out)
}

/// First credited artist of a display line (split at '/' or ',').
pub fn first_artist(display: &str) -> &str {
    display.split(['/', ',']).next().unwrap_or("").trim()
}

/// Strip `prefix` from the start of `text`, comparing case-insensitively.
fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = text.char_indices();
    for p in prefix.chars() {
        let (_, c) = rest.next()?;
        if !c.to_lowercase().eq(p.to_lowercase()) {
            return None;
        }
    }
    let offset = rest.next().map_or(text.len(), |(i, _)| i);
    Some(&text[offset..])
}

/// Article list in match order: "the", "a", "an", then extras with any
/// trailing apostrophe dropped ("l'" matches as "l").
pub fn article_list(extra: &[String]) -> Vec<String> {
    BASE_ARTICLES
        .iter()
        .map(|a| a.to_string())
        .chain(
            extra
                .iter()
                .map(|a| a.trim().trim_end_matches('\'').to_lowercase()),
        )
        .filter(|a| !a.is_empty())
        .collect()
}

/// Remove one leading article followed by a space or an apostrophe.
pub fn strip_article(text: &str, articles: &[String]) -> String {
    let text = normalize_apostrophes(text);
    let trimmed = text.trim();
    for article in articles {
        if let Some(rest) = strip_prefix_ci(trimmed, article)
            && (rest.starts_with(' ') || rest.starts_with('\''))
        {
            return rest[1..].trim().to_string();
        }
    }
    trimmed.to_string()
}

/// "Various" or "Various Artists", in any case.
pub fn is_various(artist: &str) -> bool {
    let lower = collapse_whitespace(artist).to_lowercase();
    VARIOUS_NAMES.contains(&lower.as_str())
}

/// Ensemble-sounding two-word names: "Talking Heads", "Big Star",
/// "Steve Miller Band".
pub fn is_band_like(first: &str, last: &str) -> bool {
    let first = first.to_lowercase();
    let last = last.to_lowercase();
    let first_is_given = COMMON_FIRST_NAMES.contains(&first.as_str());
    BAND_TERMS.contains(&last.as_str())
        || (last.ends_with('s') && !first_is_given)
        || (BAND_ADJECTIVES.contains(&first.as_str())
            && !COMMON_FIRST_NAMES.contains(&last.as_str()))
}

fn is_name_token(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_alphabetic() || matches!(c, '\'' | '-' | '.'))
        && token.chars().any(char::is_alphabetic)
}

fn is_function_word(token: &str, articles: &[String]) -> bool {
    let lower = token.to_lowercase();
    CONJUNCTIONS.contains(&lower.as_str()) || articles.iter().any(|a| *a == lower)
}

fn is_flippable_middle(token: &str) -> bool {
    let bare = token.trim_end_matches('.').to_lowercase();
    bare.chars().count() == 1
        || token.ends_with('.')
        || SURNAME_PARTICLES.contains(&bare.as_str())
        || COMMON_MIDDLE_NAMES.contains(&bare.as_str())
}

/// Surname-first key for a personal name, or `None` when the name should
/// keep its ordinary key.
pub fn last_name_first(artist: &str, options: &NormalizeOptions) -> Option<String> {
    let normalized = collapse_whitespace(artist).to_lowercase();
    if options
        .exclude
        .iter()
        .any(|name| collapse_whitespace(name).to_lowercase() == normalized)
    {
        return None;
    }

    let articles = article_list(&options.extra_articles);
    let tokens: Vec<&str> = first_artist(artist).split_whitespace().collect();
    if !tokens.iter().all(|t| is_name_token(t))
        || tokens.iter().any(|t| is_function_word(t, &articles))
    {
        return None;
    }

    match tokens.as_slice() {
        [first, last] => {
            if options.band_safe && is_band_like(first, last) {
                return None;
            }
            Some(format!("{last}, {first}"))
        }
        [first, middle, last] if options.allow_three_words => {
            if !is_flippable_middle(middle) {
                return None;
            }
            if options.band_safe && is_band_like(first, last) {
                return None;
            }
            Some(format!("{last}, {first} {middle}"))
        }
        _ => None,
    }
}

/// Display artist and sort key for an item.
pub fn normalize(item: &RawItem, options: &NormalizeOptions) -> (String, SortKey) {
    let display = display_artist(&item.artists);
    let articles = article_list(&options.extra_articles);

    let apostrophes = normalize_apostrophes(first_artist(&display));
    let clean = strip_numeric_suffix(&apostrophes);
    let mut artist_key = strip_article(clean, &articles);
    if options.last_name_first
        && let Some(flipped) = last_name_first(clean, options)
    {
        artist_key = flipped;
    }

    let key = SortKey {
        artist: artist_key,
        title: strip_article(&item.title, &articles),
        year: item.year,
        various: is_various(clean),
    };
    (display, key)
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
