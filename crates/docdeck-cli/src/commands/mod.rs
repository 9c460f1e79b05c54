//! Subcommand implementations.

pub mod chunk;
pub mod config;
pub mod render;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use docdeck_core::models::config::DocdeckConfig;
use docdeck_core::models::element::{LoadedDocument, load_document};
use tracing::{debug, info};

/// Where settings come from for this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`; must exist.
    Explicit(PathBuf),
    /// The per-user config file; used only if present.
    User(PathBuf),
}

impl ConfigSource {
    pub fn resolve(config_path: Option<&str>) -> Self {
        match config_path {
            Some(path) => ConfigSource::Explicit(PathBuf::from(path)),
            None => ConfigSource::User(config::default_config_path()),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::User(path) => path,
        }
    }

    /// Settings from this source, or defaults when the user file is absent.
    pub fn load(&self) -> anyhow::Result<DocdeckConfig> {
        match self {
            ConfigSource::User(path) if !path.exists() => Ok(DocdeckConfig::default()),
            _ => {
                debug!("Loading config from {}", self.path().display());
                Ok(DocdeckConfig::from_file(self.path())?)
            }
        }
    }
}

/// Load the config given with `--config`, falling back to the user config
/// file and then to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DocdeckConfig> {
    ConfigSource::resolve(config_path).load()
}

/// Read partitioner output from `input`.
pub fn read_document(input: &Path) -> anyhow::Result<LoadedDocument> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    let file = File::open(input)?;
    let document = load_document(BufReader::new(file))?;
    info!(
        "Loaded {} elements from {}",
        document.elements.len(),
        input.display()
    );
    Ok(document)
}

/// Name recorded in chunk metadata: `--filename`, then the name the
/// extractor recorded, then the input file name.
pub fn source_name(input: &Path, filename: Option<String>, recorded: Option<String>) -> String {
    filename.or(recorded).unwrap_or_else(|| {
        input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string())
    })
}
