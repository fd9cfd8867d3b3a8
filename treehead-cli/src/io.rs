use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{Context, Result};
use stdinout::Input;
use treehead::config::{HeadFinderConfig, TomlRead};
use treehead::head::CollinsHeadFinder;

use crate::progress::ReadProgress;

/// Load a head finder configuration.
pub fn load_config(config_path: &str) -> Result<HeadFinderConfig> {
    let f = File::open(config_path).context(format!(
        "Cannot open head finder configuration file: {}",
        config_path
    ))?;
    let config = HeadFinderConfig::from_toml_read(f)
        .context(format!("Cannot parse configuration file: {}", config_path))?;

    Ok(config)
}

/// Load the head finder.
///
/// Without a configuration file, the modified Collins head rules are used.
pub fn load_head_finder(config_path: Option<&str>) -> Result<CollinsHeadFinder> {
    match config_path {
        Some(config_path) => {
            let config = load_config(config_path)?;
            Ok(config
                .head_finder()
                .context(format!("Invalid head finder configuration: {}", config_path))?)
        }
        None => Ok(CollinsHeadFinder::mod_collins()),
    }
}

/// Open the input for reading.
///
/// Reads from `input` when no path is given. Otherwise, a progress bar is
/// shown while the file is read.
pub fn open_input<'a>(input: &'a Input, path: Option<&String>) -> Result<Box<dyn BufRead + 'a>> {
    match path {
        Some(path) => {
            let f = File::open(path).context(format!("Cannot open input file: {}", path))?;
            let read_progress = ReadProgress::new(f).context("Cannot create progress bar")?;
            Ok(Box::new(BufReader::new(read_progress)))
        }
        None => Ok(Box::new(
            input.buf_read().context("Cannot open input for reading")?,
        )),
    }
}
