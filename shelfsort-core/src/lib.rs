//! Shared data model for the shelfsort pipeline.
//!
//! Every stage (paginator, classifier, normalizer, sorter, price lookups,
//! writers) exchanges the types defined here, so the crate carries no
//! network or file-system dependencies of its own.

pub mod cancel;
pub mod item;
pub mod media;
pub mod ordered;

pub use cancel::CancelToken;
pub use item::{ArtistCredit, FormatDescriptor, Price, RawItem};
pub use media::{MediaCategory, MediaParseError};
pub use ordered::{OrderedItem, SortKey};
