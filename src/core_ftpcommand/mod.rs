// Here's the list of the FTP commands implemented
pub mod allo;
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod feat;
pub mod ftpcommand;
pub mod handlers;
pub mod help;
pub mod list;
pub mod mdtm;
pub mod mfmt;
pub mod mkd;
pub mod noop;
pub mod opts;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod rein;
pub mod retr;
pub mod rmd;
pub mod rnfr;
pub mod rnto;
pub mod site;
pub mod size;
pub mod stat;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

// The utils and common functions are here
pub mod utils;

#[cfg(test)]
mod test_listing;

use crate::core_hooks::SessionHooks;
use crate::core_permissions::PermissionStore;
use crate::Config;
use std::sync::Arc;

/// Everything a command handler needs besides the session itself.
pub struct CommandContext {
    pub config: Arc<Config>,
    pub store: Arc<PermissionStore>,
    pub hooks: Arc<SessionHooks>,
}
