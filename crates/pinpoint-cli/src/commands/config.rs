//! Config command: show the point selection settings in effect

use anyhow::{Context, Result};
use pinpoint_viewer::PointSelectionConfig;
use std::path::Path;

/// Load `path`, or the defaults when no file is given
pub fn load(path: Option<&str>) -> Result<PointSelectionConfig> {
    match path {
        Some(path) => PointSelectionConfig::load_from_file(Path::new(path))
            .with_context(|| format!("Failed to load config {}", path)),
        None => Ok(PointSelectionConfig::default()),
    }
}

pub fn run(path: Option<&str>) -> Result<()> {
    let config = load(path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
