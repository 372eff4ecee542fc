use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("catalog '{0}' has no entries")]
    EmptyCatalog(String),

    #[error("catalog '{catalog}' lists '{entry}' more than once")]
    DuplicateEntry { catalog: String, entry: String },

    #[error("missing required field: {0}")]
    MissingField(String),
}
