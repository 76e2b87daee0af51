//! `accordion catalog` command: print the category / platform / asset tree.

use anyhow::{Result, bail};

use accordion_core::Catalog;

/// Run the catalog command, optionally narrowed to one category or one
/// platform within it.
pub fn run_catalog(catalog: &Catalog, category: Option<&str>, platform: Option<&str>) -> Result<()> {
    let categories: Vec<&str> = match category {
        Some(c) if !catalog.has_category(c) => {
            bail!(
                "unknown category {c:?}; available: {}",
                catalog.categories().join(", ")
            )
        }
        Some(c) => vec![c],
        None => catalog.categories(),
    };

    for c in categories {
        let platforms: Vec<&str> = match platform {
            Some(p) if !catalog.has_platform(c, p) => {
                bail!(
                    "unknown platform {p:?} in {c}; available: {}",
                    catalog.platforms(c).join(", ")
                )
            }
            Some(p) => vec![p],
            None => catalog.platforms(c),
        };

        println!("{c}");
        for p in platforms {
            println!("  {p}");
            for asset in catalog.assets(c, p) {
                println!("    - {asset}");
            }
        }
    }

    Ok(())
}
