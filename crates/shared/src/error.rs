use thiserror::Error;

/// Failures that stop a catalog document from loading at all.
///
/// Individual bad records never produce an error; they are skipped and
/// reported through [`crate::catalog::Catalog::skipped`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}
