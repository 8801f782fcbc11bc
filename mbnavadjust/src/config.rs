//! Defaults for new projects, loaded from an INI file.
//!
//! ```ini
//! [project]
//! section_length = 10.0
//! section_soundings = 100000
//! contour_interval = 25.0
//! color_interval = 100.0
//! tick_interval = 100.0
//! decimation = 1
//! smoothing = 2.0
//! zoffset_width = 5.0
//! ```
//!
//! Missing keys keep their defaults. Unknown keys are ignored.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use thiserror::Error;

use crate::model::{ProjectParameters, SIGMA_MINIMUM};

const SECTION: &str = "project";

/// Errors loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value for {key}: `{value}`")]
    InvalidValue { key: &'static str, value: String },
}

/// Parameters given to newly created projects.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDefaults {
    pub section_length: f64,
    pub section_soundings: i32,
    pub contour_interval: f64,
    pub color_interval: f64,
    pub tick_interval: f64,
    pub decimation: i32,
    pub smoothing: f64,
    pub zoffset_width: f64,
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        let p = ProjectParameters::default();
        Self {
            section_length: p.section_length,
            section_soundings: p.section_soundings,
            contour_interval: p.contour_interval,
            color_interval: p.color_interval,
            tick_interval: p.tick_interval,
            decimation: p.decimation,
            smoothing: p.smoothing,
            zoffset_width: p.zoffset_width,
        }
    }
}

/// `<config dir>/mbnavadjust/config.ini`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mbnavadjust").join("config.ini"))
}

fn parse_key<T: FromStr>(ini: &Ini, key: &'static str, target: &mut T) -> Result<(), ConfigError> {
    let Some(raw) = ini.get_from(Some(SECTION), key) else {
        return Ok(());
    };
    *target = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })?;
    Ok(())
}

impl ProjectDefaults {
    /// Loads from the default location, falling back to built-in values
    /// when there is no config file.
    pub fn load() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    /// Parses INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Read {
            path: PathBuf::new(),
            source: ini::Error::Parse(e),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut d = Self::default();
        parse_key(ini, "section_length", &mut d.section_length)?;
        parse_key(ini, "section_soundings", &mut d.section_soundings)?;
        parse_key(ini, "contour_interval", &mut d.contour_interval)?;
        parse_key(ini, "color_interval", &mut d.color_interval)?;
        parse_key(ini, "tick_interval", &mut d.tick_interval)?;
        parse_key(ini, "decimation", &mut d.decimation)?;
        parse_key(ini, "smoothing", &mut d.smoothing)?;
        parse_key(ini, "zoffset_width", &mut d.zoffset_width)?;
        Ok(d)
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some(SECTION))
            .set("section_length", self.section_length.to_string())
            .set("section_soundings", self.section_soundings.to_string())
            .set("contour_interval", self.contour_interval.to_string())
            .set("color_interval", self.color_interval.to_string())
            .set("tick_interval", self.tick_interval.to_string())
            .set("decimation", self.decimation.to_string())
            .set("smoothing", self.smoothing.to_string())
            .set("zoffset_width", self.zoffset_width.to_string());
        ini
    }

    /// Writes the defaults to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)
    }

    /// Project parameters seeded from these defaults.
    pub fn to_parameters(&self) -> ProjectParameters {
        ProjectParameters {
            section_length: self.section_length,
            section_soundings: self.section_soundings,
            decimation: self.decimation,
            contour_interval: self.contour_interval,
            color_interval: self.color_interval,
            tick_interval: self.tick_interval,
            precision: SIGMA_MINIMUM,
            smoothing: self.smoothing,
            zoffset_width: self.zoffset_width,
        }
    }
}
