use crate::config::FuzzyConfig;
use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Save a configuration to a file
pub fn save_to_file<P: AsRef<Path>>(config: &FuzzyConfig, path: P) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, config)?;
    Ok(())
}

/// Load a configuration from a file
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<FuzzyConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: FuzzyConfig = serde_json::from_reader(reader)?;
    Ok(config)
}
