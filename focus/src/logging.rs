//! File logging setup.
//!
//! The library itself only talks to the `log` facade. Applications call
//! [`init`] once to send those records to a file.

use std::fs::File;
use std::path::Path;

pub use log::LevelFilter;
use simplelog::{Config, WriteLogger};

use crate::error::FocusError;

/// Install a [`WriteLogger`] writing to `path` at `level`.
///
/// The file is truncated. Fails if a logger is already installed.
pub fn init(path: impl AsRef<Path>, level: LevelFilter) -> Result<(), FocusError> {
    let file = File::create(path)?;
    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}
