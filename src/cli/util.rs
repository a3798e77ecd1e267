use std::io::Write;

use clap::Args;
use log::debug;

use crate::configs::catalog::{Catalog, CatalogEntry};
use crate::configs::settings::Settings;
use crate::error::{Result, ToolError};

use super::{heading, BIN_NAME};

#[derive(Debug, Args, Clone)]
pub struct UtilArgs {
    /// Utility name, snake_case or camelCase
    pub name: Option<String>,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub rest: Vec<String>,
}

impl UtilArgs {
    pub fn handle(&self, catalog: &Catalog, settings: &Settings, out: &mut dyn Write) -> Result<()> {
        let Some(name) = &self.name else {
            writeln!(out, "Please specify a utility name.")?;
            writeln!(out, "Example: {} util obj_if", BIN_NAME)?;
            return Err(ToolError::MissingArgument("utilName".to_string()));
        };

        match catalog.find(name) {
            Some(entry) => print_entry(entry, settings, out),
            None => {
                debug!("no catalog entry for {}", name);
                writeln!(out, "Utility '{}' not found.", name)?;
                Ok(())
            }
        }
    }
}

fn print_entry(entry: &CatalogEntry, settings: &Settings, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "\n{}:", heading(&entry.name, settings))?;
    writeln!(out, "- Type: {}", entry.kind)?;
    writeln!(out, "- Source: {}", entry.source)?;
    writeln!(out, "\nUsage example:")?;
    writeln!(out, "{}", entry.usage_for(&settings.package_name))?;
    Ok(())
}
