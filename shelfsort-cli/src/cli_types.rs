//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use shelfsort_lib::{BoxSetPolicy, LpPolicy, VariousPolicy};

#[derive(Parser)]
#[command(name = "shelfsort")]
#[command(about = "Sort a Discogs collection into physical shelf order", long_about = None)]
pub(crate) struct Cli {
    /// Personal access token (overrides $DISCOGS_TOKEN and the credentials file)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// User agent sent with every request
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Fetch the collection and write shelf lists
    #[command(visible_alias = "run")]
    Sort(SortArgs),

    /// Inspect credentials and settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved credentials (masked) and their sources
    Show,
    /// Print the credentials and settings file paths
    Path,
    /// Check the token against the identity endpoint
    Test,
}

/// Media selection and classification.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct MediaArgs {
    /// LP evidence required: permissive, probable, strict
    #[arg(long, value_name = "POLICY")]
    pub lp_mode: Option<LpPolicy>,

    /// Box-set handling: album, require-rpm
    #[arg(long, value_name = "POLICY")]
    pub box_set: Option<BoxSetPolicy>,

    /// Skip the LP shelf
    #[arg(long)]
    pub no_lp: bool,

    /// Also shelve 7" singles
    #[arg(long)]
    pub include_45s: bool,

    /// Also shelve CDs
    #[arg(long)]
    pub include_cds: bool,

    /// Write the probable-mode exclusion report
    #[arg(long)]
    pub report_filters: bool,

    /// Print classification counters after fetching
    #[arg(long)]
    pub debug_stats: bool,
}

/// Sort key options.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct KeyArgs {
    /// Extra leading articles to ignore (e.g., le,la,die)
    #[arg(long, value_delimiter = ',')]
    pub articles_extra: Vec<String>,

    /// Where compilations go: normal, first, last, title
    #[arg(long, value_name = "POLICY")]
    pub various: Option<VariousPolicy>,

    /// File solo artists as "Last, First"
    #[arg(long)]
    pub lnf: bool,

    /// Also flip three-word names when the middle word allows it
    #[arg(long, requires = "lnf")]
    pub lnf_allow_3: bool,

    /// Names never flipped (comma separated)
    #[arg(long, value_delimiter = ',', requires = "lnf")]
    pub lnf_exclude: Vec<String>,

    /// Leave band-like names alone
    #[arg(long, requires = "lnf")]
    pub lnf_band_safe: bool,
}

/// Output layout.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct LayoutArgs {
    /// Insert "=== A ===" divider lines
    #[arg(long)]
    pub dividers: bool,

    /// Pad artist and title into columns
    #[arg(long)]
    pub align: bool,

    /// Append the release country
    #[arg(long)]
    pub show_country: bool,

    /// Also write JSON files
    #[arg(long)]
    pub json: bool,

    /// Directory for output files (default: current directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct SortArgs {
    #[command(flatten)]
    pub media: MediaArgs,

    #[command(flatten)]
    pub keys: KeyArgs,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Collection folder id (0 = All)
    #[arg(long)]
    pub folder: Option<u64>,

    /// Items per page, 1-100
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Report items whose lowest price is above this amount
    #[arg(long, value_name = "AMOUNT")]
    pub value_threshold: Option<f64>,

    /// Currency for price lookups (e.g., USD, EUR)
    #[arg(long)]
    pub currency: Option<String>,
}
