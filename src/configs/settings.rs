use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const ENV_PREFIX: &str = "UTILS_TOOLKIT";

/// Output settings for the CLI.
///
/// Layered lowest to highest: built-in defaults, the user config file
/// (`<config dir>/utils-toolkit/config.toml`), `UTILS_TOOLKIT_*` env vars.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Crate name used in printed usage snippets.
    pub package_name: String,
    /// Force headings on or off. Unset means follow the terminal.
    pub color: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            package_name: env!("CARGO_PKG_NAME").to_string(),
            color: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_file().as_deref())
    }

    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder().set_default("package_name", defaults.package_name)?;

        if let Some(path) = file {
            debug!("reading settings from {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn use_color(&self) -> bool {
        self.color.unwrap_or_else(console::colors_enabled)
    }
}

pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("utils-toolkit").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.package_name, "utils_toolkit");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "package_name = \"my_kit\"\ncolor = false").unwrap();

        let settings = Settings::load_from(Some(file.path())).unwrap();
        assert_eq!(settings.package_name, "my_kit");
        assert_eq!(settings.color, Some(false));
        assert!(!settings.use_color());
    }
}
