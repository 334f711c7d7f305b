//! Shelf list writers.
//!
//! Every file is rendered in memory first (see [`render_outputs`]) and then
//! persisted by [`write_outputs`], which never leaves a partial set behind.

pub mod error;
pub mod json;
pub mod reports;
pub mod tabular;
pub mod text;
pub mod writer;

use shelfsort_core::OrderedItem;
use shelfsort_lib::OutputOptions;

pub use error::ExportError;
pub use json::{JsonFormat, JsonRecord, render_combined};
pub use reports::{render_probable_exclusions, render_valuable, valuable_file_name};
pub use tabular::CsvFormat;
pub use text::{TextFormat, format_line};
pub use writer::{
    COMBINED_JSON_FILE, RenderedFile, render_outputs, write_files, write_outputs,
};

/// A per-shelf file format.
pub trait ShelfFormat {
    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    /// Render one shelf's items in shelf order.
    fn render(&self, items: &[OrderedItem], options: &OutputOptions)
    -> Result<Vec<u8>, ExportError>;
}
