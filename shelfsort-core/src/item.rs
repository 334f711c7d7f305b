use serde::{Deserialize, Serialize};

/// Base URL for human-facing release pages.
const RELEASE_PAGE_BASE: &str = "https://www.discogs.com/release";

/// One artist credit on a release, with the joiner the catalog places
/// before the next credit (e.g. ",", "&", "Feat.").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCredit {
    pub name: String,
    pub join: String,
}

impl ArtistCredit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            join: String::new(),
        }
    }

    pub fn joined(name: impl Into<String>, join: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            join: join.into(),
        }
    }
}

/// A physical format entry: a name plus free-text qualifiers,
/// e.g. `Vinyl` with `["LP", "Album", "33 ⅓ RPM"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub name: String,
    /// Number of physical units ("2" for a double LP). Empty when unknown.
    pub qty: String,
    pub descriptions: Vec<String>,
}

impl FormatDescriptor {
    pub fn new(name: impl Into<String>, descriptions: &[&str]) -> Self {
        Self {
            name: name.into(),
            qty: String::new(),
            descriptions: descriptions.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Case-insensitive name comparison, ignoring surrounding whitespace.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name)
    }

    /// Qualifiers trimmed and lowercased; empty entries dropped.
    pub fn qualifiers(&self) -> Vec<String> {
        self.descriptions
            .iter()
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect()
    }

    /// Render as "2xVinyl, LP, Album".
    pub fn summary(&self) -> Option<String> {
        let name = self.name.trim();
        let qty = self.qty.trim();
        let descs: Vec<&str> = self
            .descriptions
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .collect();
        let base = match (qty, name) {
            ("" | "1", "") => String::new(),
            ("" | "1", n) => n.to_string(),
            (q, "") => q.to_string(),
            (q, n) => format!("{q}x{n}"),
        };
        match (base.is_empty(), descs.is_empty()) {
            (true, true) => None,
            (true, false) => Some(descs.join(", ")),
            (false, true) => Some(base),
            (false, false) => Some(format!("{}, {}", base, descs.join(", "))),
        }
    }
}

/// A price in minor currency units (hundredths) plus its ISO currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub minor_units: u64,
    pub currency: String,
}

impl Price {
    pub fn new(minor_units: u64, currency: impl Into<String>) -> Self {
        Self {
            minor_units,
            currency: currency.into(),
        }
    }

    /// Convert a major-unit amount as reported by the catalog (e.g. `12.5`).
    /// Negative or non-finite values are rejected.
    pub fn from_major(amount: f64, currency: impl Into<String>) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        Some(Self::new((amount * 100.0).round() as u64, currency))
    }

    /// Whole major units, rounded half up.
    pub fn major_rounded(&self) -> u64 {
        (self.minor_units + 50) / 100
    }
}

/// One catalog entry exactly as the collection endpoint described it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub release_id: u64,
    pub master_id: Option<u64>,
    pub artists: Vec<ArtistCredit>,
    pub title: String,
    /// Release year; the catalog reports `0` for unknown, stored as `None`.
    pub year: Option<u16>,
    pub formats: Vec<FormatDescriptor>,
    pub country: String,
    pub label: String,
    pub catno: String,
    pub notes: String,
}

impl RawItem {
    /// Minimal item for a single credited artist.
    pub fn new(release_id: u64, artist: &str, title: &str, year: Option<u16>) -> Self {
        Self {
            release_id,
            artists: vec![ArtistCredit::new(artist)],
            title: title.to_string(),
            year,
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: FormatDescriptor) -> Self {
        self.formats.push(format);
        self
    }

    pub fn with_country(mut self, country: &str) -> Self {
        self.country = country.to_string();
        self
    }

    pub fn with_label(mut self, label: &str, catno: &str) -> Self {
        self.label = label.to_string();
        self.catno = catno.to_string();
        self
    }

    /// Public release page, or an empty string when the id is unknown.
    pub fn release_url(&self) -> String {
        if self.release_id == 0 {
            String::new()
        } else {
            format!("{}/{}", RELEASE_PAGE_BASE, self.release_id)
        }
    }

    /// Semicolon-separated format summary ("2xVinyl, LP; CD, Album").
    pub fn format_summary(&self) -> String {
        self.formats
            .iter()
            .filter_map(FormatDescriptor::summary)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_summary_joins_quantities_and_qualifiers() {
        let mut double = FormatDescriptor::new("Vinyl", &["LP", "Album"]);
        double.qty = "2".to_string();
        let item = RawItem::new(1, "Artist", "Title", None)
            .with_format(double)
            .with_format(FormatDescriptor::new("CD", &[]));
        assert_eq!(item.format_summary(), "2xVinyl, LP, Album; CD");
    }

    #[test]
    fn qualifiers_are_trimmed_and_lowercased() {
        let f = FormatDescriptor::new("Vinyl", &[" LP ", "", "33 ⅓ RPM"]);
        assert_eq!(f.qualifiers(), vec!["lp", "33 ⅓ rpm"]);
    }

    #[test]
    fn price_conversion() {
        let p = Price::from_major(12.5, "USD").unwrap();
        assert_eq!(p.minor_units, 1250);
        assert_eq!(p.major_rounded(), 13);
        assert!(Price::from_major(-1.0, "USD").is_none());
        assert!(Price::from_major(f64::NAN, "USD").is_none());
    }

    #[test]
    fn release_url_empty_without_id() {
        assert_eq!(RawItem::default().release_url(), "");
        assert_eq!(
            RawItem::new(249504, "A", "B", None).release_url(),
            "https://www.discogs.com/release/249504"
        );
    }
}
