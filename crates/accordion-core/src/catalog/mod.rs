//! The asset catalog: a read-only category -> platform -> asset hierarchy.
//!
//! The built-in catalog is defined in `catalog.toml` and embedded in the
//! binary at compile time. A replacement catalog with the same shape can be
//! loaded from disk; either way the catalog is validated once at load time
//! and never mutated afterwards.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One selectable asset, identified by its position in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub category: String,
    pub platform: String,
    pub asset_name: String,
}

impl CatalogEntry {
    pub fn new(
        category: impl Into<String>,
        platform: impl Into<String>,
        asset_name: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            platform: platform.into(),
            asset_name: asset_name.into(),
        }
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {}",
            self.category, self.platform, self.asset_name
        )
    }
}

/// A top-level category (e.g. `Digital`, `Print`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub platforms: Vec<Platform>,
}

/// A platform within a category, with the assets it offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    pub assets: Vec<String>,
}

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("catalog must contain at least one category")]
    NoCategories,

    #[error("duplicate category: {0:?}")]
    DuplicateCategory(String),

    #[error("category {0:?} has no platforms")]
    EmptyCategory(String),

    #[error("duplicate platform {platform:?} in category {category:?}")]
    DuplicatePlatform { category: String, platform: String },

    #[error("platform {platform:?} in category {category:?} has no assets")]
    EmptyPlatform { category: String, platform: String },

    #[error("duplicate asset {asset:?} on platform {platform:?} in category {category:?}")]
    DuplicateAsset {
        category: String,
        platform: String,
        asset: String,
    },
}

/// The validated catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

/// The embedded catalog TOML.
static CATALOG_TOML: &str = include_str!("catalog.toml");

impl Catalog {
    /// Load the built-in catalog.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed. The file ships with the
    /// crate and is covered by tests, so a built binary always has a valid
    /// catalog.
    pub fn builtin() -> Self {
        Self::from_toml_str(CATALOG_TOML).expect("embedded catalog.toml is invalid")
    }

    /// Parse and validate a catalog from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse and validate a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.categories.is_empty() {
            return Err(CatalogError::NoCategories);
        }

        let mut categories = HashSet::new();
        for category in &self.categories {
            if !categories.insert(category.name.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.name.clone()));
            }
            if category.platforms.is_empty() {
                return Err(CatalogError::EmptyCategory(category.name.clone()));
            }

            let mut platforms = HashSet::new();
            for platform in &category.platforms {
                if !platforms.insert(platform.name.as_str()) {
                    return Err(CatalogError::DuplicatePlatform {
                        category: category.name.clone(),
                        platform: platform.name.clone(),
                    });
                }
                if platform.assets.is_empty() {
                    return Err(CatalogError::EmptyPlatform {
                        category: category.name.clone(),
                        platform: platform.name.clone(),
                    });
                }

                let mut assets = HashSet::new();
                for asset in &platform.assets {
                    if !assets.insert(asset.as_str()) {
                        return Err(CatalogError::DuplicateAsset {
                            category: category.name.clone(),
                            platform: platform.name.clone(),
                            asset: asset.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Category names, in catalog order.
    pub fn categories(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Platform names for a category, in catalog order.
    ///
    /// Returns an empty list for an unknown category.
    pub fn platforms(&self, category: &str) -> Vec<&str> {
        self.find_category(category)
            .map(|c| c.platforms.iter().map(|p| p.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Asset names for a category/platform pair, in catalog order.
    ///
    /// Returns an empty list when either level is unknown.
    pub fn assets(&self, category: &str, platform: &str) -> Vec<&str> {
        self.find_platform(category, platform)
            .map(|p| p.assets.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Look up a single entry. `None` if any level is not in the catalog.
    pub fn entry(&self, category: &str, platform: &str, asset: &str) -> Option<CatalogEntry> {
        let p = self.find_platform(category, platform)?;
        p.assets
            .iter()
            .any(|a| a == asset)
            .then(|| CatalogEntry::new(category, platform, asset))
    }

    /// Every entry in the catalog, flattened in catalog order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.categories
            .iter()
            .flat_map(|c| {
                c.platforms.iter().flat_map(move |p| {
                    p.assets
                        .iter()
                        .map(move |a| CatalogEntry::new(&c.name, &p.name, a))
                })
            })
            .collect()
    }

    /// Whether the category exists.
    pub fn has_category(&self, category: &str) -> bool {
        self.find_category(category).is_some()
    }

    /// Whether the platform exists within the category.
    pub fn has_platform(&self, category: &str, platform: &str) -> bool {
        self.find_platform(category, platform).is_some()
    }

    fn find_category(&self, category: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == category)
    }

    fn find_platform(&self, category: &str, platform: &str) -> Option<&Platform> {
        self.find_category(category)?
            .platforms
            .iter()
            .find(|p| p.name == platform)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.categories(),
            vec!["Digital", "Print", "Video", "Mobile"]
        );
        assert_eq!(catalog.entries().len(), 36);
    }

    #[test]
    fn platforms_preserve_catalog_order() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.platforms("Digital"),
            vec!["MailOnline", "Metro", "Newsletter"]
        );
        assert_eq!(
            catalog.platforms("Mobile"),
            vec!["MailPlus App", "Mobile Web"]
        );
    }

    #[test]
    fn assets_for_platform() {
        let catalog = Catalog::builtin();
        let assets = catalog.assets("Print", "Daily Mail");
        assert_eq!(assets, vec!["Full Page", "Half Page", "Sponsored Content"]);
    }

    #[test]
    fn unknown_levels_yield_empty_lists() {
        let catalog = Catalog::builtin();
        assert!(catalog.platforms("Radio").is_empty());
        assert!(catalog.assets("Digital", "Teletext").is_empty());
        assert!(catalog.assets("Radio", "MailOnline").is_empty());
    }

    #[test]
    fn entry_lookup() {
        let catalog = Catalog::builtin();
        let entry = catalog
            .entry("Video", "Social Video", "LinkedIn Video")
            .expect("entry should exist");
        assert_eq!(entry.category, "Video");
        assert_eq!(entry.platform, "Social Video");
        assert_eq!(entry.asset_name, "LinkedIn Video");

        // Asset exists, but on a different platform.
        assert!(catalog.entry("Video", "Social Video", "EDITS Video").is_none());
    }

    #[test]
    fn same_asset_name_on_different_platforms() {
        let catalog = Catalog::builtin();
        let full_pages: Vec<_> = catalog
            .entries()
            .into_iter()
            .filter(|e| e.asset_name == "Full Page")
            .collect();
        assert_eq!(full_pages.len(), 4);
    }

    #[test]
    fn rejects_empty_catalog() {
        let err = Catalog::from_toml_str("categories = []").unwrap_err();
        assert!(
            matches!(err, CatalogError::NoCategories),
            "expected NoCategories, got: {err}"
        );
    }

    #[test]
    fn rejects_duplicate_category() {
        let toml_str = r#"
[[categories]]
name = "Digital"
[[categories.platforms]]
name = "Metro"
assets = ["Full Page"]

[[categories]]
name = "Digital"
[[categories.platforms]]
name = "Metro"
assets = ["Full Page"]
"#;
        let err = Catalog::from_toml_str(toml_str).unwrap_err();
        assert!(
            matches!(err, CatalogError::DuplicateCategory(ref n) if n == "Digital"),
            "expected DuplicateCategory, got: {err}"
        );
    }

    #[test]
    fn rejects_platform_without_assets() {
        let toml_str = r#"
[[categories]]
name = "Digital"
[[categories.platforms]]
name = "Metro"
assets = []
"#;
        let err = Catalog::from_toml_str(toml_str).unwrap_err();
        assert!(
            matches!(err, CatalogError::EmptyPlatform { .. }),
            "expected EmptyPlatform, got: {err}"
        );
    }

    #[test]
    fn rejects_duplicate_asset() {
        let toml_str = r#"
[[categories]]
name = "Print"
[[categories.platforms]]
name = "Daily Mail"
assets = ["Full Page", "Full Page"]
"#;
        let err = Catalog::from_toml_str(toml_str).unwrap_err();
        assert!(
            matches!(err, CatalogError::DuplicateAsset { ref asset, .. } if asset == "Full Page"),
            "expected DuplicateAsset, got: {err}"
        );
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = Catalog::from_toml_str("not toml {{{").unwrap_err();
        assert!(
            matches!(err, CatalogError::TomlError(_)),
            "expected TomlError, got: {err}"
        );
    }

    #[test]
    fn entry_display() {
        let entry = CatalogEntry::new("Digital", "Metro", "Full Page");
        assert_eq!(entry.to_string(), "Digital / Metro / Full Page");
    }
}
