use std::path::Path;

use framecompare_shared::catalog::Catalog;

pub struct Assets {
    pub catalog: Catalog,
}

impl Assets {
    pub fn load(catalog_path: &Path) -> Result<Self, String> {
        let catalog = Catalog::from_path(catalog_path)
            .map_err(|e| format!("Failed to load {}: {}", catalog_path.display(), e))?;

        tracing::info!(
            formats = catalog.formats().len(),
            circles = catalog.circles().len(),
            categories = catalog.categories().len(),
            presets = catalog.presets().len(),
            skipped = catalog.skipped().len(),
            "Loaded catalog"
        );

        Ok(Assets { catalog })
    }

    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self, String> {
        let catalog =
            Catalog::from_json(json).map_err(|e| format!("Failed to parse catalog: {}", e))?;
        Ok(Assets { catalog })
    }
}
