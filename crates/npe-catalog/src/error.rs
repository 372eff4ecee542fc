use thiserror::Error;

use npe_core::error::CoreError;

/// Startup-time configuration problems. None of these can occur while
/// serving a request.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("differential map references '{label}', which is not in {catalog}")]
    UnknownCategory { catalog: String, label: String },

    #[error("'{0}' lists itself as a differential")]
    SelfDifferential(String),

    #[error("'{category}' lists differential '{neighbor}' more than once")]
    DuplicateDifferential { category: String, neighbor: String },

    #[error("{catalog} has {available} entries but option sets need {needed}")]
    CatalogTooSmall {
        catalog: String,
        needed: usize,
        available: usize,
    },

    #[error("option sets need at least 3 entries, got {0}")]
    OptionCountTooSmall(usize),

    #[error("no age group profile with key '{0}'")]
    MissingDefaultAgeGroup(String),
}
