//! Log output for the CLI.
//!
//! User-facing messages go through the `log` macros so `--quiet` and
//! `--logfile` apply to them uniformly.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::LevelFilter;

use crate::error::CliError;

/// Stdout plus an optional plain-text copy of every line.
struct LogSink {
    file: Option<File>,
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = &mut self.file {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}

pub(crate) fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger. `--verbose` wins over `--quiet`.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let file = match logfile {
        Some(path) => Some(File::create(path).map_err(|e| {
            CliError::config(format!("cannot open log file {}: {}", path.display(), e))
        })?),
        None => None,
    };

    env_logger::Builder::new()
        .filter_level(level_for(quiet, verbose))
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper_util", LevelFilter::Warn)
        .filter_module("rustls", LevelFilter::Warn)
        .format(move |buf, record| {
            if verbose {
                writeln!(
                    buf,
                    "{} {:<5} {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.args()
                )
            } else {
                writeln!(buf, "{}", record.args())
            }
        })
        .target(env_logger::Target::Pipe(Box::new(LogSink { file })))
        .try_init()
        .map_err(|e| CliError::other(format!("logger already installed: {}", e)))
}
