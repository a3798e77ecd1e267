use std::io::Write;

use crate::configs::catalog::Catalog;
use crate::configs::settings::Settings;
use crate::error::Result;

use super::heading;

pub fn print_catalog(catalog: &Catalog, settings: &Settings, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "\n{}", heading("Available utilities:", settings))?;
    for category in &catalog.categories {
        writeln!(out, "\n{}:", heading(&category.title, settings))?;
        for entry in &category.entries {
            writeln!(out, "- {}", entry.name)?;
        }
    }
    Ok(())
}
