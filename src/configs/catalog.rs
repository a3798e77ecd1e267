use std::fmt;
use std::fs;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};
use crate::general_utils::camel_case_to_snake;

const EMBEDDED_CATALOG: &str = include_str!("catalog.yaml");

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Category {
    pub title: String,
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub kind: EntryKind,
    pub source: String,
    pub usage: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Function,
    Type,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Function => write!(f, "Function"),
            EntryKind::Type => write!(f, "Type"),
        }
    }
}

impl CatalogEntry {
    /// Usage snippet with `{crate}` replaced by `crate_name`.
    pub fn usage_for(&self, crate_name: &str) -> String {
        match &self.usage {
            Some(usage) => usage.trim_end().replace("{crate}", crate_name),
            None => format!("use {}::general_utils::{};", crate_name, self.name),
        }
    }
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_yaml(EMBEDDED_CATALOG)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        info!("Loading catalog from {}", path);
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let catalog: Catalog = serde_yaml::from_str(content)
            .map_err(|e| ToolError::ParseError(e.to_string()))?;
        debug!("catalog has {} categories", catalog.categories.len());
        Ok(catalog)
    }

    /// Look up by exact name, falling back to the snake_case form so
    /// camelCase names like `objIf` resolve too.
    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        let snake = camel_case_to_snake(name);
        self.entries()
            .find(|e| e.name == name)
            .or_else(|| self.entries().find(|e| e.name == snake))
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.categories.iter().flat_map(|c| c.entries.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_parses() {
        let catalog = Catalog::embedded().unwrap();
        let titles: Vec<_> = catalog.categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Global State",
                "Object utilities",
                "Array utilities",
                "String utilities",
                "Function utilities"
            ]
        );
        assert!(catalog.entries().count() > 20);
    }

    #[test]
    fn test_find_accepts_camel_case() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.find("objIf").unwrap().name, "obj_if");
        assert_eq!(catalog.find("obj_if").unwrap().name, "obj_if");
        assert_eq!(catalog.find("GlobalState").unwrap().kind, EntryKind::Type);
        assert!(catalog.find("leftPad").is_none());
    }

    #[test]
    fn test_usage_snippets() {
        let catalog = Catalog::embedded().unwrap();
        let obj_if = catalog.find("obj_if").unwrap();
        assert_eq!(obj_if.usage_for("mykit"), "use mykit::general_utils::obj_if;");

        let state = catalog.find("GlobalState").unwrap();
        let usage = state.usage_for("mykit");
        assert!(usage.starts_with("use mykit::{GlobalState, StateConfig};"));
        assert!(usage.contains("GlobalState::create"));
    }

    #[test]
    fn test_invalid_catalog_fails() {
        let result = Catalog::from_yaml("categories: 12");
        assert!(matches!(result, Err(ToolError::ParseError(_))));
    }
}
