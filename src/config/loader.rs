//! Reading [`MutationConfig`] from TOML settings files.

use crate::config::schema::{ConfigDocument, ValidationError};
use crate::config::settings::MutationConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read mutation settings from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("mutation settings{} are not valid TOML: {source}", origin(.path))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("mutation settings{} rejected:\n{source}", origin(.path))]
    Invalid {
        path: Option<PathBuf>,
        #[source]
        source: ValidationError,
    },
}

fn origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" in {}", path.display()))
        .unwrap_or_default()
}

impl FromStr for MutationConfig {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        parse(input, None)
    }
}

/// Parse and validate settings. `origin` is recorded in any error.
fn parse(input: &str, origin: Option<&Path>) -> Result<MutationConfig, ConfigError> {
    let path = || origin.map(Path::to_path_buf);
    let document: ConfigDocument = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Parse { path: path(), source })?;
    document
        .validate()
        .map_err(|source| ConfigError::Invalid { path: path(), source })
}

pub fn load_from_str(input: &str) -> Result<MutationConfig, ConfigError> {
    input.parse()
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<MutationConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, Some(path))
}
