/// Physical media categories a collection item can be shelved under.
///
/// `Excluded` is the catch-all for items that match no enabled category;
/// it never produces output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaCategory {
    /// 12" long-player at 33 1/3 RPM.
    Lp,
    /// 7" single at 45 RPM.
    Single45,
    /// Compact disc (including CD-R).
    Cd,
    /// Not shelved in this run.
    Excluded,
}

/// Shelved categories in output order.
const SHELVED: &[MediaCategory] = &[MediaCategory::Lp, MediaCategory::Single45, MediaCategory::Cd];

impl MediaCategory {
    /// Stem used for output file names (`<stem>_shelf_order.txt`).
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Lp => "vinyl",
            Self::Single45 => "vinyl45",
            Self::Cd => "cd",
            Self::Excluded => "excluded",
        }
    }

    /// Tag written into structured output (`media_type` field).
    pub fn media_tag(&self) -> &'static str {
        match self {
            Self::Lp => "LP",
            Self::Single45 => "45",
            Self::Cd => "CD",
            Self::Excluded => "",
        }
    }

    /// Short label for summaries ("LP: 12 • 45s: 3").
    pub fn summary_label(&self) -> &'static str {
        match self {
            Self::Lp => "LP",
            Self::Single45 => "45s",
            Self::Cd => "CDs",
            Self::Excluded => "Excluded",
        }
    }

    /// All accepted names for this category (case-insensitive matching).
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Lp => &["lp", "vinyl", "33", "album"],
            Self::Single45 => &["45", "vinyl45", "single", "7\"", "7in"],
            Self::Cd => &["cd", "cdr", "compact disc"],
            Self::Excluded => &["excluded"],
        }
    }

    /// The categories that can produce shelf output, in output order.
    pub fn shelved() -> &'static [MediaCategory] {
        SHELVED
    }

    pub fn is_shelved(&self) -> bool {
        !matches!(self, Self::Excluded)
    }
}

impl std::fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lp => write!(f, "LP"),
            Self::Single45 => write!(f, "7\" single"),
            Self::Cd => write!(f, "CD"),
            Self::Excluded => write!(f, "excluded"),
        }
    }
}

/// Error returned when a string cannot be parsed into a `MediaCategory`.
#[derive(Debug, Clone)]
pub struct MediaParseError(pub String);

impl std::fmt::Display for MediaParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown media category: '{}'", self.0)
    }
}

impl std::error::Error for MediaParseError {}

impl std::str::FromStr for MediaCategory {
    type Err = MediaParseError;

    /// Parse a shelved category from any recognized name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        SHELVED
            .iter()
            .copied()
            .find(|cat| cat.aliases().contains(&lower.as_str()))
            .ok_or_else(|| MediaParseError(s.to_string()))
    }
}
