use crate::core_ftpcommand::CommandContext;
use crate::core_vfs::{join_virtual, normalize_virtual, Vfs, VfsError};
use crate::session::Session;
use std::path::PathBuf;

/// A command argument translated into both worlds: the normalized
/// virtual path the client sees and the real path below the group root.
pub struct Resolved {
    pub vfs: Vfs,
    pub virtual_path: String,
    pub real: PathBuf,
}

/// Resolves a path argument against the session's working directory.
/// Failures come back as ready-made reply lines; an escape is reported
/// as a server error, not a not-found.
pub fn resolve_arg(
    ctx: &CommandContext,
    session: &Session,
    arg: &str,
) -> Result<Resolved, String> {
    let user = current_user(session);
    let root = ctx
        .store
        .root(&user)
        .ok_or_else(|| "550 no root directory resolved".to_string())?;
    let vfs = Vfs::new(root);
    let virtual_path = normalize_virtual(&join_virtual(&session.current_dir, arg))
        .map_err(|e| match e {
            VfsError::Escape => "550 illegal internal path".to_string(),
            VfsError::NotAbsolute(p) => format!("550 \"{}\" bad path", p),
        })?;
    let real = vfs.resolve(&virtual_path).map_err(|e| match e {
        VfsError::Escape => "550 illegal internal path".to_string(),
        VfsError::NotAbsolute(p) => format!("550 \"{}\" bad path", p),
    })?;
    Ok(Resolved {
        vfs,
        virtual_path,
        real,
    })
}

/// The session's user name; before USER completed this is empty and all
/// permission lookups fall through to the guest group.
pub fn current_user(session: &Session) -> String {
    session.username.clone().unwrap_or_default()
}
