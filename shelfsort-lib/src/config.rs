//! Run configuration: every option a shelf-sorting run recognizes.
//!
//! A `RunConfiguration` is assembled once through `RunConfigurationBuilder`
//! and validated before any network call. Stages only ever read it.

use std::path::{Path, PathBuf};

use shelfsort_catalog::FetchRequest;
use shelfsort_core::MediaCategory;

use crate::error::ShelfError;

/// Largest page size the catalog accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Error returned when a policy name is not recognized.
#[derive(Debug, Clone)]
pub struct PolicyParseError {
    pub kind: &'static str,
    pub value: String,
}

impl std::fmt::Display for PolicyParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for PolicyParseError {}

/// How much evidence a vinyl record needs to count as a 33 RPM LP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LpPolicy {
    /// "LP" or "Album" is enough.
    #[default]
    Permissive,
    /// "LP"/"Album" unless the same descriptor names 45 or 78 RPM.
    Probable,
    /// "LP"/"Album" plus explicit 33 RPM evidence.
    Strict,
}

/// How box sets are treated by LP classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxSetPolicy {
    /// Box sets follow the active `LpPolicy` like any album.
    #[default]
    AsAlbum,
    /// Box sets count as LPs only with explicit 33 RPM evidence.
    RequireRpm,
}

/// Where "Various Artists" compilations go on the shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariousPolicy {
    /// Filed under "Various" like any other artist.
    #[default]
    Normal,
    First,
    Last,
    /// Filed under their own title.
    Title,
}

impl LpPolicy {
    pub fn all() -> &'static [LpPolicy] {
        &[Self::Permissive, Self::Probable, Self::Strict]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Permissive => "permissive",
            Self::Probable => "probable",
            Self::Strict => "strict",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Permissive => &["default", "loose"],
            Self::Probable => &["probable-33", "probable33"],
            Self::Strict => &[],
        }
    }
}

impl BoxSetPolicy {
    pub fn all() -> &'static [BoxSetPolicy] {
        &[Self::AsAlbum, Self::RequireRpm]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AsAlbum => "album",
            Self::RequireRpm => "require-rpm",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::AsAlbum => &["as-album", "lp"],
            Self::RequireRpm => &["rpm", "strict"],
        }
    }
}

impl VariousPolicy {
    pub fn all() -> &'static [VariousPolicy] {
        &[Self::Normal, Self::First, Self::Last, Self::Title]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::First => "first",
            Self::Last => "last",
            Self::Title => "title",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Case-insensitive lookup by canonical name or alias.
fn parse_named<T: Copy>(
    s: &str,
    kind: &'static str,
    all: &[T],
    name: fn(&T) -> &'static str,
    aliases: fn(&T) -> &'static [&'static str],
) -> Result<T, PolicyParseError> {
    let lower = s.trim().to_lowercase();
    all.iter()
        .copied()
        .find(|p| name(p) == lower || aliases(p).contains(&lower.as_str()))
        .ok_or_else(|| PolicyParseError {
            kind,
            value: s.to_string(),
        })
}

impl std::str::FromStr for LpPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(s, "LP policy", Self::all(), Self::name, Self::aliases)
    }
}

impl std::str::FromStr for BoxSetPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(s, "box-set policy", Self::all(), Self::name, Self::aliases)
    }
}

impl std::str::FromStr for VariousPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(s, "various-artists policy", Self::all(), Self::name, Self::aliases)
    }
}

impl std::fmt::Display for LpPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::fmt::Display for BoxSetPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::fmt::Display for VariousPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Media classification options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyPolicy {
    pub lp: LpPolicy,
    pub box_set: BoxSetPolicy,
    pub include_lp: bool,
    pub include_45: bool,
    pub include_cd: bool,
}

impl Default for ClassifyPolicy {
    fn default() -> Self {
        Self {
            lp: LpPolicy::default(),
            box_set: BoxSetPolicy::default(),
            include_lp: true,
            include_45: false,
            include_cd: false,
        }
    }
}

impl ClassifyPolicy {
    pub fn is_enabled(&self, category: MediaCategory) -> bool {
        match category {
            MediaCategory::Lp => self.include_lp,
            MediaCategory::Single45 => self.include_45,
            MediaCategory::Cd => self.include_cd,
            MediaCategory::Excluded => false,
        }
    }

    /// Enabled categories in output order.
    pub fn enabled(&self) -> Vec<MediaCategory> {
        MediaCategory::shelved()
            .iter()
            .copied()
            .filter(|c| self.is_enabled(*c))
            .collect()
    }
}

/// Artist and title key options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Articles stripped in addition to "the", "a" and "an".
    pub extra_articles: Vec<String>,
    pub last_name_first: bool,
    /// Also flip "First Middle Last" when the middle token allows it.
    pub allow_three_words: bool,
    /// Names never flipped, compared case- and whitespace-insensitively.
    pub exclude: Vec<String>,
    /// Skip names that look like bands.
    pub band_safe: bool,
}

/// Presentation options for the writers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub dividers: bool,
    pub align: bool,
    pub show_country: bool,
    pub json: bool,
    /// Write the probable-mode exclusion report.
    pub report_exclusions: bool,
}

/// Marketplace price lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceOptions {
    /// Report items priced above this many major units. `None` skips lookups.
    pub threshold: Option<f64>,
    pub currency: String,
}

impl Default for PriceOptions {
    fn default() -> Self {
        Self {
            threshold: None,
            currency: "USD".to_string(),
        }
    }
}

impl PriceOptions {
    /// Threshold in minor units (hundredths).
    pub fn threshold_minor(&self) -> Option<u64> {
        self.threshold
            .filter(|t| t.is_finite() && *t >= 0.0)
            .map(|t| (t * 100.0).round() as u64)
    }
}

/// Every recognized option of a run.
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    classify: ClassifyPolicy,
    normalize: NormalizeOptions,
    various: VariousPolicy,
    output: OutputOptions,
    fetch: FetchRequest,
    price: PriceOptions,
    output_dir: PathBuf,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            classify: ClassifyPolicy::default(),
            normalize: NormalizeOptions::default(),
            various: VariousPolicy::default(),
            output: OutputOptions::default(),
            fetch: FetchRequest::default(),
            price: PriceOptions::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl RunConfiguration {
    pub fn builder() -> RunConfigurationBuilder {
        RunConfigurationBuilder::default()
    }

    pub fn classify(&self) -> &ClassifyPolicy {
        &self.classify
    }

    pub fn normalize(&self) -> &NormalizeOptions {
        &self.normalize
    }

    pub fn various(&self) -> VariousPolicy {
        self.various
    }

    pub fn output(&self) -> &OutputOptions {
        &self.output
    }

    pub fn fetch(&self) -> &FetchRequest {
        &self.fetch
    }

    pub fn price(&self) -> &PriceOptions {
        &self.price
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Check every constraint that can be checked without the network.
    pub fn validate(&self) -> Result<(), ShelfError> {
        let per_page = self.fetch.per_page;
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(ShelfError::configuration(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}, got {per_page}"
            )));
        }
        if self.fetch.max_pages == Some(0) {
            return Err(ShelfError::configuration("max_pages must be at least 1"));
        }
        if self.classify.enabled().is_empty() {
            return Err(ShelfError::configuration(
                "no media categories enabled (LP, 45s and CDs are all off)",
            ));
        }
        let currency = self.price.currency.trim();
        if currency.is_empty() || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ShelfError::configuration(format!(
                "currency must be an alphabetic code such as USD, got '{}'",
                self.price.currency
            )));
        }
        if let Some(threshold) = self.price.threshold
            && (!threshold.is_finite() || threshold < 0.0)
        {
            return Err(ShelfError::configuration(format!(
                "value threshold must be a non-negative number, got {threshold}"
            )));
        }
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(ShelfError::configuration(format!(
                "output path {} exists and is not a directory",
                self.output_dir.display()
            )));
        }
        Ok(())
    }
}

/// Builder for `RunConfiguration`. `build` validates.
#[derive(Debug, Clone, Default)]
pub struct RunConfigurationBuilder {
    config: RunConfiguration,
}

impl RunConfigurationBuilder {
    pub fn lp_policy(mut self, policy: LpPolicy) -> Self {
        self.config.classify.lp = policy;
        self
    }

    pub fn box_set_policy(mut self, policy: BoxSetPolicy) -> Self {
        self.config.classify.box_set = policy;
        self
    }

    pub fn include_lp(mut self, on: bool) -> Self {
        self.config.classify.include_lp = on;
        self
    }

    pub fn include_45s(mut self, on: bool) -> Self {
        self.config.classify.include_45 = on;
        self
    }

    pub fn include_cds(mut self, on: bool) -> Self {
        self.config.classify.include_cd = on;
        self
    }

    pub fn extra_articles<I, S>(mut self, articles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.normalize.extra_articles = clean_list(articles);
        self
    }

    pub fn last_name_first(mut self, on: bool) -> Self {
        self.config.normalize.last_name_first = on;
        self
    }

    pub fn allow_three_words(mut self, on: bool) -> Self {
        self.config.normalize.allow_three_words = on;
        self
    }

    pub fn lnf_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.normalize.exclude = clean_list(names);
        self
    }

    pub fn band_safe(mut self, on: bool) -> Self {
        self.config.normalize.band_safe = on;
        self
    }

    pub fn various_policy(mut self, policy: VariousPolicy) -> Self {
        self.config.various = policy;
        self
    }

    pub fn dividers(mut self, on: bool) -> Self {
        self.config.output.dividers = on;
        self
    }

    pub fn align(mut self, on: bool) -> Self {
        self.config.output.align = on;
        self
    }

    pub fn show_country(mut self, on: bool) -> Self {
        self.config.output.show_country = on;
        self
    }

    pub fn json(mut self, on: bool) -> Self {
        self.config.output.json = on;
        self
    }

    pub fn report_exclusions(mut self, on: bool) -> Self {
        self.config.output.report_exclusions = on;
        self
    }

    pub fn folder_id(mut self, folder_id: u64) -> Self {
        self.config.fetch.folder_id = folder_id;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.config.fetch.per_page = per_page;
        self
    }

    pub fn max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.config.fetch.max_pages = max_pages;
        self
    }

    pub fn value_threshold(mut self, threshold: Option<f64>) -> Self {
        self.config.price.threshold = threshold;
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.config.price.currency = currency.into().trim().to_uppercase();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn build(self) -> Result<RunConfiguration, ShelfError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn clean_list<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(|v| v.into().trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
