use thiserror::Error;

#[derive(Error, Debug)]
pub enum PermissionError {
    #[error("Failed to read permission table: {0}")]
    TableReadError(String),

    #[error("Malformed permission table line: {0}")]
    TableParseError(String),
}
