//! Response bodies of the catalog endpoints this crate calls.
//!
//! Only the fields the pipeline uses are modelled; everything else in the
//! payload is ignored by serde.

use serde::{Deserialize, Deserializer};

use shelfsort_core::{ArtistCredit, FormatDescriptor, RawItem};

/// `GET /oauth/identity`
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    pub username: String,
}

/// One page of `GET /users/{u}/collection/folders/{f}/releases`.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionPage {
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub releases: Vec<CollectionRelease>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub items: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionRelease {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub instance_id: Option<u64>,
    /// Either a plain string or a list of `{field_id, value}` objects,
    /// depending on how the folder's custom fields are set up.
    #[serde(default)]
    pub notes: Option<serde_json::Value>,
    #[serde(default)]
    pub basic_information: Option<BasicInformation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasicInformation {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub master_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub artists: Vec<ArtistEntry>,
    #[serde(default)]
    pub formats: Vec<FormatEntry>,
    #[serde(default)]
    pub labels: Vec<LabelEntry>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub join: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub qty: String,
    #[serde(default)]
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub catno: String,
}

/// `GET /releases/{id}?curr_abbr=...`, marketplace subset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleasePrice {
    #[serde(default)]
    pub lowest_price: Option<f64>,
    #[serde(default)]
    pub num_for_sale: Option<u32>,
    #[serde(default)]
    pub blocked_from_sale: bool,
}

/// The catalog sends `qty` as `"2"` on most endpoints and `2` on some.
fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn flatten_notes(notes: Option<&serde_json::Value>) -> String {
    match notes {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Array(fields)) => fields
            .iter()
            .filter_map(|f| match f {
                serde_json::Value::String(s) => Some(s.trim().to_string()),
                serde_json::Value::Object(map) => map
                    .get("value")
                    .and_then(|v| v.as_str())
                    .map(|s| s.trim().to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        _ => String::new(),
    }
}

impl CollectionRelease {
    /// Convert to the pipeline's item type. A missing `basic_information`
    /// block yields an item with only its id and notes.
    pub fn into_raw_item(self) -> RawItem {
        let notes = flatten_notes(self.notes.as_ref());
        let basic = self.basic_information.unwrap_or_default();
        let release_id = if basic.id != 0 { basic.id } else { self.id };
        let (label, catno) = basic
            .labels
            .first()
            .map(|l| (l.name.trim().to_string(), l.catno.trim().to_string()))
            .unwrap_or_default();

        RawItem {
            release_id,
            master_id: basic.master_id.filter(|&id| id != 0),
            artists: basic
                .artists
                .into_iter()
                .map(|a| ArtistCredit::joined(a.name, a.join))
                .collect(),
            title: basic.title,
            year: basic
                .year
                .filter(|&y| y != 0)
                .and_then(|y| u16::try_from(y).ok()),
            formats: basic
                .formats
                .into_iter()
                .map(|f| FormatDescriptor {
                    name: f.name,
                    qty: f.qty,
                    descriptions: f.descriptions,
                })
                .collect(),
            country: basic.country.unwrap_or_default(),
            label,
            catno,
            notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collection_release_converts_to_raw_item() {
        let release: CollectionRelease = serde_json::from_value(json!({
            "id": 1,
            "instance_id": 99,
            "notes": [{"field_id": 3, "value": "VG+ sleeve"}],
            "basic_information": {
                "id": 249504,
                "master_id": 0,
                "title": "Kind Of Blue",
                "year": 1959,
                "artists": [{"name": "Miles Davis", "join": ""}],
                "formats": [{"name": "Vinyl", "qty": 1, "descriptions": ["LP", "Album"]}],
                "labels": [{"name": "Columbia", "catno": "CL 1355"}],
                "country": "US"
            }
        }))
        .unwrap();

        let item = release.into_raw_item();
        assert_eq!(item.release_id, 249504);
        assert_eq!(item.master_id, None);
        assert_eq!(item.year, Some(1959));
        assert_eq!(item.formats[0].qty, "1");
        assert_eq!(item.label, "Columbia");
        assert_eq!(item.catno, "CL 1355");
        assert_eq!(item.notes, "VG+ sleeve");
        assert_eq!(item.country, "US");
    }

    #[test]
    fn zero_year_means_unknown() {
        let release: CollectionRelease = serde_json::from_value(json!({
            "id": 7,
            "basic_information": {"title": "Untitled", "year": 0}
        }))
        .unwrap();
        let item = release.into_raw_item();
        assert_eq!(item.year, None);
        assert_eq!(item.release_id, 7);
        assert!(item.artists.is_empty());
    }

    #[test]
    fn plain_string_notes_are_kept() {
        assert_eq!(flatten_notes(Some(&json!(" signed "))), "signed");
        assert_eq!(flatten_notes(Some(&json!(null))), "");
        assert_eq!(flatten_notes(None), "");
    }
}
