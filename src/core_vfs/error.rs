use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VfsError {
    /// Resolution climbed above the user's root. Reported as a server
    /// error, never as a plain not-found.
    #[error("path escapes the user root")]
    Escape,

    #[error("virtual path is not absolute: {0}")]
    NotAbsolute(String),
}
