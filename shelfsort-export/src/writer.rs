use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use shelfsort_core::CancelToken;
use shelfsort_lib::{LpPolicy, RunConfiguration, RunOutput};

use crate::ShelfFormat;
use crate::error::ExportError;
use crate::json::{JsonFormat, render_combined};
use crate::reports::{
    PROBABLE_REPORT_FILE, render_probable_exclusions, render_valuable, valuable_file_name,
};
use crate::tabular::CsvFormat;
use crate::text::TextFormat;

/// Serializes writers that share an output directory within this process.
static WRITE_LOCK: Mutex<()> = Mutex::new(());

pub const COMBINED_JSON_FILE: &str = "all_media_shelf_order.json";

/// One file ready to be written: name relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

fn shelf_file_name(stem: &str, format: &dyn ShelfFormat) -> String {
    format!("{}_shelf_order.{}", stem, format.extension())
}

/// Render every output file in memory, in a fixed order.
pub fn render_outputs(
    output: &RunOutput,
    config: &RunConfiguration,
) -> Result<Vec<RenderedFile>, ExportError> {
    let options = config.output();
    let mut formats: Vec<&dyn ShelfFormat> = vec![&TextFormat as &dyn ShelfFormat, &CsvFormat];
    if options.json {
        formats.push(&JsonFormat);
    }

    let mut files = Vec::new();
    for shelf in &output.shelves {
        for format in &formats {
            files.push(RenderedFile {
                name: shelf_file_name(shelf.category.file_stem(), *format),
                bytes: format.render(&shelf.items, options)?,
            });
        }
    }

    if options.json && output.shelves.len() >= 2 {
        files.push(RenderedFile {
            name: COMBINED_JSON_FILE.to_string(),
            bytes: render_combined(&output.shelves)?,
        });
    }

    if let Some(threshold) = config.price().threshold {
        files.push(RenderedFile {
            name: valuable_file_name(threshold),
            bytes: render_valuable(
                &output.shelves,
                threshold,
                &config.price().currency,
                options,
            ),
        });
    }

    if config.classify().lp == LpPolicy::Probable && options.report_exclusions {
        files.push(RenderedFile {
            name: PROBABLE_REPORT_FILE.to_string(),
            bytes: render_probable_exclusions(&output.probable_exclusions),
        });
    }

    Ok(files)
}

fn temp_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn remove_temps(temps: &[PathBuf]) {
    for tmp in temps {
        if let Err(e) = fs::remove_file(tmp) {
            log::debug!("Could not remove {}: {}", tmp.display(), e);
        }
    }
}

/// Write every rendered file into the configured output directory.
///
/// All contents go to `<name>.tmp` first and are renamed into place only
/// once every temp file exists, so a failure leaves no partial output.
/// Returns the written paths in render order.
pub fn write_outputs(
    output: &RunOutput,
    config: &RunConfiguration,
    cancel: &CancelToken,
) -> Result<Vec<PathBuf>, ExportError> {
    if cancel.is_cancelled() {
        return Err(ExportError::Cancelled);
    }
    let files = render_outputs(output, config)?;
    write_files(config.output_dir(), &files, cancel)
}

/// Persist pre-rendered files into `dir`, creating it if needed.
pub fn write_files(
    dir: &Path,
    files: &[RenderedFile],
    cancel: &CancelToken,
) -> Result<Vec<PathBuf>, ExportError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.display().to_string()));
    }
    fs::create_dir_all(dir)?;

    let _guard = WRITE_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let mut temps = Vec::with_capacity(files.len());
    for file in files {
        let tmp = temp_path(&dir.join(&file.name));
        if let Err(e) = fs::write(&tmp, &file.bytes) {
            remove_temps(&temps);
            return Err(e.into());
        }
        temps.push(tmp);
    }

    if cancel.is_cancelled() {
        remove_temps(&temps);
        return Err(ExportError::Cancelled);
    }

    let mut written = Vec::with_capacity(files.len());
    for (idx, file) in files.iter().enumerate() {
        let target = dir.join(&file.name);
        if let Err(e) = fs::rename(&temps[idx], &target) {
            remove_temps(&temps[idx..]);
            return Err(e.into());
        }
        log::debug!("Wrote {}", target.display());
        written.push(target);
    }
    log::info!("Wrote {} files to {}", written.len(), dir.display());
    Ok(written)
}
