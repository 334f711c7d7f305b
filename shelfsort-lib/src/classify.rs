//! Media-type classification of collection items.
//!
//! Qualifier matching is case-insensitive and ignores surrounding
//! whitespace. LP is checked first, then 7" single, then CD, so every
//! item lands in exactly one category.

use shelfsort_core::{FormatDescriptor, MediaCategory, RawItem};

use crate::config::{BoxSetPolicy, ClassifyPolicy, LpPolicy};

const SEVEN_INCH: &[&str] = &["7\"", "7in", "7-inch", "7''"];
const TWELVE_INCH: &[&str] = &["12\"", "12in", "12-inch", "12''"];

/// Lowercased qualifiers of one format descriptor, plus a compact form with
/// dots and spaces removed ("33 ⅓ RPM" -> "33⅓rpm").
struct Qualifiers {
    plain: Vec<String>,
    compact: Vec<String>,
}

impl Qualifiers {
    fn of(format: &FormatDescriptor) -> Self {
        let plain = format.qualifiers();
        let compact = plain
            .iter()
            .map(|q| q.replace(['.', ' '], ""))
            .collect();
        Self { plain, compact }
    }

    fn has_any(&self, tokens: &[&str]) -> bool {
        self.plain.iter().any(|q| tokens.contains(&q.as_str()))
    }

    fn is_seven_inch(&self) -> bool {
        self.has_any(SEVEN_INCH)
    }

    fn is_twelve_inch(&self) -> bool {
        self.has_any(TWELVE_INCH)
    }

    fn is_long_player(&self) -> bool {
        self.has_any(&["lp", "album"])
    }

    /// "33 RPM" in one qualifier, or "33" alongside a separate RPM or LP hint.
    fn has_33rpm(&self) -> bool {
        if self.compact.iter().any(|q| q.contains("33") && q.contains("rpm")) {
            return true;
        }
        let has_33 = self.compact.iter().any(|q| q.contains("33"));
        let has_rpm = self.compact.iter().any(|q| q.ends_with("rpm"));
        has_33 && (has_rpm || self.is_long_player())
    }

    fn has_45rpm(&self) -> bool {
        self.compact
            .iter()
            .any(|q| q == "45" || (q.contains("45") && q.contains("rpm")))
    }

    fn names_45_or_78(&self) -> bool {
        self.compact
            .iter()
            .any(|q| q.contains("45") || q.contains("78"))
    }

    fn is_box_set(&self) -> bool {
        self.has_any(&["box set", "boxset"])
    }
}

fn vinyl_qualifiers(item: &RawItem) -> Vec<Qualifiers> {
    item.formats
        .iter()
        .filter(|f| f.is_named("vinyl"))
        .map(Qualifiers::of)
        .collect()
}

fn is_box_set(item: &RawItem, vinyl: &[Qualifiers]) -> bool {
    item.formats
        .iter()
        .any(|f| f.is_named("box set") || f.is_named("boxset"))
        || vinyl.iter().any(Qualifiers::is_box_set)
}

fn descriptor_is_lp(q: &Qualifiers, lp: LpPolicy) -> bool {
    if q.is_seven_inch() {
        return false;
    }
    match lp {
        LpPolicy::Permissive => q.is_long_player() || (q.is_twelve_inch() && q.has_33rpm()),
        LpPolicy::Probable => q.is_long_player() && !q.names_45_or_78(),
        LpPolicy::Strict => q.is_long_player() && q.has_33rpm(),
    }
}

fn is_lp(item: &RawItem, vinyl: &[Qualifiers], policy: &ClassifyPolicy) -> bool {
    let require_rpm =
        policy.box_set == BoxSetPolicy::RequireRpm && is_box_set(item, vinyl);
    vinyl
        .iter()
        .any(|q| descriptor_is_lp(q, policy.lp) && (!require_rpm || q.has_33rpm()))
}

fn is_single45(vinyl: &[Qualifiers]) -> bool {
    vinyl.iter().any(|q| q.is_seven_inch() || q.has_45rpm())
}

fn is_cd(item: &RawItem) -> bool {
    item.formats
        .iter()
        .any(|f| f.is_named("cd") || f.is_named("cdr"))
}

/// Physical category of an item, before category enablement is applied.
pub fn detect(item: &RawItem, policy: &ClassifyPolicy) -> MediaCategory {
    let vinyl = vinyl_qualifiers(item);
    if is_lp(item, &vinyl, policy) {
        MediaCategory::Lp
    } else if is_single45(&vinyl) {
        MediaCategory::Single45
    } else if is_cd(item) {
        MediaCategory::Cd
    } else {
        MediaCategory::Excluded
    }
}

/// Category an item is shelved under in this run. Categories that are not
/// enabled come back as `Excluded`.
pub fn classify(item: &RawItem, policy: &ClassifyPolicy) -> MediaCategory {
    let category = detect(item, policy);
    if policy.is_enabled(category) {
        category
    } else {
        MediaCategory::Excluded
    }
}

/// Counters collected while classifying a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationStats {
    pub scanned: usize,
    /// Items with at least one vinyl descriptor.
    pub vinyl: usize,
    /// Vinyl items marked LP or Album.
    pub vinyl_lp: usize,
    /// Vinyl LP items that also name 33 RPM.
    pub vinyl_lp_33: usize,
    pub lp: usize,
    pub single45: usize,
    pub cd: usize,
    pub excluded: usize,
}

impl ClassificationStats {
    pub fn count(&self, category: MediaCategory) -> usize {
        match category {
            MediaCategory::Lp => self.lp,
            MediaCategory::Single45 => self.single45,
            MediaCategory::Cd => self.cd,
            MediaCategory::Excluded => self.excluded,
        }
    }

    fn record(&mut self, vinyl: &[Qualifiers], category: MediaCategory) {
        self.scanned += 1;
        if !vinyl.is_empty() {
            self.vinyl += 1;
            if vinyl.iter().any(Qualifiers::is_long_player) {
                self.vinyl_lp += 1;
                if vinyl
                    .iter()
                    .any(|q| q.compact.iter().any(|t| t.contains("33") && t.contains("rpm")))
                {
                    self.vinyl_lp_33 += 1;
                }
            }
        }
        match category {
            MediaCategory::Lp => self.lp += 1,
            MediaCategory::Single45 => self.single45 += 1,
            MediaCategory::Cd => self.cd += 1,
            MediaCategory::Excluded => self.excluded += 1,
        }
    }
}

/// Stateful classifier that keeps statistics and, in probable mode, the
/// LP/Album records turned away for naming 45 or 78 RPM.
#[derive(Debug)]
pub struct Classifier {
    policy: ClassifyPolicy,
    stats: ClassificationStats,
    probable_exclusions: Vec<RawItem>,
}

impl Classifier {
    pub fn new(policy: ClassifyPolicy) -> Self {
        Self {
            policy,
            stats: ClassificationStats::default(),
            probable_exclusions: Vec::new(),
        }
    }

    pub fn classify(&mut self, item: &RawItem) -> MediaCategory {
        let vinyl = vinyl_qualifiers(item);
        let category = classify(item, &self.policy);
        self.stats.record(&vinyl, category);

        if self.policy.lp == LpPolicy::Probable
            && category != MediaCategory::Lp
            && vinyl
                .iter()
                .any(|q| !q.is_seven_inch() && q.is_long_player() && q.names_45_or_78())
        {
            log::debug!(
                "Probable mode excluded release {} ({}): explicit 45/78 qualifier",
                item.release_id,
                item.title
            );
            self.probable_exclusions.push(item.clone());
        }
        category
    }

    pub fn stats(&self) -> &ClassificationStats {
        &self.stats
    }

    pub fn into_parts(self) -> (ClassificationStats, Vec<RawItem>) {
        (self.stats, self.probable_exclusions)
    }
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
