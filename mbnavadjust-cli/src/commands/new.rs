//! Project creation.

use std::path::Path;

use mbnavadjust::config::{default_config_path, ProjectDefaults};
use mbnavadjust::store::create_project;

use crate::error::CliError;

/// Create an empty project from the defaults file.
///
/// An explicit `--config` file must load; the default location falls back
/// to built-in defaults when absent.
pub fn run(path: &Path, config: Option<&Path>) -> Result<(), CliError> {
    let defaults = match config {
        Some(file) => ProjectDefaults::load_from(file)?,
        None => ProjectDefaults::load().unwrap_or_default(),
    };

    let project = create_project(path, defaults.to_parameters())?;

    println!("Created project {}", project.paths.name);
    println!("  Home:     {}", project.paths.home.display());
    println!("  Data:     {}", project.paths.datadir.display());
    match config.map(Path::to_path_buf).or_else(default_config_path) {
        Some(file) if file.exists() => println!("  Defaults: {}", file.display()),
        _ => println!("  Defaults: built-in"),
    }
    Ok(())
}
