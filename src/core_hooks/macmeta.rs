use std::io;
use std::path::Path;

/// Extended file type/creator metadata of Macintosh filesystems.
///
/// Platforms without the capability plug in the no-op implementation;
/// metadata handling is an add-on and must never affect a transfer.
pub trait MacMetadata: Send + Sync {
    /// Records type/creator information of a downloaded file.
    fn acquire(&self, path: &Path) -> io::Result<()>;

    /// Applies recorded type/creator information to an uploaded file.
    fn apply(&self, path: &Path) -> io::Result<()>;
}

pub struct NoopMacMetadata;

impl MacMetadata for NoopMacMetadata {
    fn acquire(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn apply(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}
