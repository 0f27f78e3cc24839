//! CLI command implementations.

pub mod order;
pub mod quote;

use printforge_checkout::workflow::CheckoutWorkflow;
use printforge_checkout::{config::CheckoutConfig, DesignFile};
use printforge_core::Material;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] printforge_checkout::config::ConfigError),

    /// A design file could not be read.
    #[error("could not read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The material name was not recognized.
    #[error(transparent)]
    Material(#[from] printforge_core::ParseEnumError),

    /// A workflow operation failed.
    #[error(transparent)]
    Workflow(#[from] printforge_checkout::WorkflowError),

    /// Requested rate index is out of range.
    #[error("no shipping rate at index {index}; {available} offered")]
    RateOutOfRange { index: usize, available: usize },

    /// The server offered no shipping rates for this destination.
    #[error("no shipping rates available for this destination")]
    NoRatesOffered,
}

/// Build a workflow from the environment configuration.
pub fn workflow() -> Result<CheckoutWorkflow, CommandError> {
    let config = CheckoutConfig::from_env()?;
    Ok(CheckoutWorkflow::new(&config)?)
}

/// Parse a material name from the command line.
pub fn parse_material(name: &str) -> Result<Material, CommandError> {
    Ok(name.parse::<Material>()?)
}

/// Read one design file from disk.
pub fn read_file(path: &Path) -> Result<DesignFile, CommandError> {
    DesignFile::read(path).map_err(|source| CommandError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}
