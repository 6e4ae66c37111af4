//! Load simulation inputs from JSON documents

use super::RentabilityInput;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rentability input: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse an input document held in memory
pub fn parse_input(json: &str) -> Result<RentabilityInput, InputError> {
    Ok(serde_json::from_str(json)?)
}

/// Load an input document from any reader (file, request body, stdin)
pub fn load_input_from_reader<R: Read>(reader: R) -> Result<RentabilityInput, InputError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load an input document from a JSON file
pub fn load_input<P: AsRef<Path>>(path: P) -> Result<RentabilityInput, InputError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_input_from_reader(BufReader::new(file))
}
