//! mbnavadjust - swath navigation adjustment projects
//!
//! This library holds the data side of a navigation adjustment project:
//! survey files split into sections with coverage masks, crossings between
//! overlapping sections, and ties measured at those crossings. It reads and
//! writes every historical version of the project file, computes section
//! overlaps, discovers crossings and writes derived views for other tools.
//!
//! # Example
//!
//! ```no_run
//! use mbnavadjust::{manager, store};
//! use std::path::Path;
//!
//! let mut project = store::open_project(Path::new("survey.nvh"))?;
//! manager::refresh_overlaps(&mut project);
//! store::save_project(&project)?;
//! # Ok::<(), mbnavadjust::ProjectError>(())
//! ```

pub mod codec;
pub mod config;
pub mod coord;
pub mod error;
pub mod export;
pub mod logging;
pub mod manager;
pub mod mask;
pub mod model;
pub mod store;

pub use error::{InvariantViolation, ParseError, ProjectError, ProjectResult};
pub use model::Project;
