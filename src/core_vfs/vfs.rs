use crate::core_vfs::error::VfsError;
use std::path::{Path, PathBuf};

/// Maps the virtual filesystem a client sees onto the real tree below a
/// group root. Virtual paths are always absolute, `/`-rooted and use `/`
/// as separator regardless of platform.
#[derive(Debug, Clone)]
pub struct Vfs {
    root: PathBuf,
}

impl Vfs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Translates a virtual absolute path into the real path below the root.
    pub fn resolve(&self, vpath: &str) -> Result<PathBuf, VfsError> {
        let normalized = normalize_virtual(vpath)?;
        let mut real = self.root.clone();
        for part in normalized.split('/').filter(|p| !p.is_empty()) {
            real.push(part);
        }
        Ok(real)
    }

    /// Translates a real path below the root back into the client's view.
    pub fn virtual_of(&self, real: &Path) -> Result<String, VfsError> {
        let rel = real.strip_prefix(&self.root).map_err(|_| VfsError::Escape)?;
        let mut vpath = String::from("/");
        for part in rel.components() {
            if vpath.len() > 1 {
                vpath.push('/');
            }
            vpath.push_str(&part.as_os_str().to_string_lossy());
        }
        Ok(vpath)
    }
}

/// Makes a virtual absolute path out of a command argument, relative
/// arguments are taken against the current working directory.
pub fn join_virtual(current_dir: &str, arg: &str) -> String {
    if arg.starts_with('/') || arg.starts_with('\\') {
        arg.to_string()
    } else if current_dir == "/" {
        format!("/{}", arg)
    } else {
        format!("{}/{}", current_dir, arg)
    }
}

/// Normalizes a virtual absolute path: collapses `.` and `..` components
/// and unifies separators. Climbing above the virtual root is an escape.
pub fn normalize_virtual(vpath: &str) -> Result<String, VfsError> {
    if !(vpath.starts_with('/') || vpath.starts_with('\\')) {
        return Err(VfsError::NotAbsolute(vpath.to_string()));
    }
    let mut stack: Vec<&str> = Vec::new();
    for part in vpath.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                if stack.pop().is_none() {
                    return Err(VfsError::Escape);
                }
            }
            other => stack.push(other),
        }
    }
    if stack.is_empty() {
        Ok(String::from("/"))
    } else {
        Ok(format!("/{}", stack.join("/")))
    }
}

/// The parent of a virtual path; the root is its own parent.
pub fn parent_virtual(vpath: &str) -> String {
    match vpath.rfind('/') {
        Some(0) | None => String::from("/"),
        Some(pos) => vpath[..pos].to_string(),
    }
}

/// Platform housekeeping files blinded out of listings and purged when
/// they block a directory delete.
pub fn invisible_file(name: &str) -> bool {
    name == ".DS_Store" || (name.starts_with("Icon") && name.len() == 5)
}
