//! CLI subcommands.

pub mod batch;
pub mod detect;
pub mod import;

use std::path::Path;

use ispbill_core::{ImportConfig, InMemoryServiceDirectory, Service};

/// Load pipeline configuration, falling back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ImportConfig> {
    match config_path {
        Some(path) => Ok(ImportConfig::from_file(Path::new(path))?),
        None => Ok(ImportConfig::default()),
    }
}

/// Load the service directory from a services CSV.
///
/// Expected columns: id, provider_id, name, line_number,
/// billing_account_number, status. Empty optional cells are fine.
pub fn load_services(path: &Path) -> anyhow::Result<InMemoryServiceDirectory> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut directory = InMemoryServiceDirectory::default();
    for record in reader.deserialize() {
        let service: Service = record?;
        directory.push(service);
    }

    if directory.is_empty() {
        anyhow::bail!("no services loaded from {}", path.display());
    }
    Ok(directory)
}
