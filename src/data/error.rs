use std::path::PathBuf;

use thiserror::Error;

/// Anything that prevents a dataset from becoming a [`ListingTable`].
///
/// [`ListingTable`]: super::model::ListingTable
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("dataset contains no rows")]
    NoRows,

    #[error("column '{0}' has no values")]
    EmptyColumn(String),
}
