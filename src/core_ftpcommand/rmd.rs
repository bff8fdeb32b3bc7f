use crate::core_ftpcommand::utils::{current_user, resolve_arg};
use crate::core_ftpcommand::CommandContext;
use crate::helpers::decode_char;
use crate::session::{LoginState, Session};
use log::info;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the RMD (and XRMD) FTP command.
///
/// The pre-hook purges invisible housekeeping files first; the client
/// cannot see them, yet they block a real directory delete.
pub async fn handle_rmd_command(
    _writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    let session = session.lock().await;
    if session.state < LoginState::LoggedIn {
        return Ok("530 not logged in".to_string());
    }
    let path = decode_char(&session.charcoding, arg.trim());
    if path.is_empty() {
        return Ok("501 syntax error".to_string());
    }
    let resolved = match resolve_arg(&ctx, &session, &path) {
        Ok(r) => r,
        Err(reply) => return Ok(reply),
    };
    if !resolved.real.is_dir() {
        return Ok(format!("550 \"{}\" is not a directory path", path));
    }
    if !ctx
        .hooks
        .delete_folder_pre(&current_user(&session), &resolved.real)
    {
        return Ok("550 error: no permission to remove".to_string());
    }
    let remaining = std::fs::read_dir(&resolved.real)
        .map(|entries| entries.count())
        .unwrap_or(0);
    if remaining != 0 {
        return Ok(format!("550 \"{}\" error: dir is not empty", path));
    }
    if std::fs::remove_dir(&resolved.real).is_ok() {
        ctx.hooks.delete_folder_post(&resolved.real);
        info!("deleted directory {}", resolved.real.display());
        Ok(format!("250 {} deleted", resolved.virtual_path))
    } else {
        Ok(format!("550 \"{}\" error: dir cannot be deleted", path))
    }
}
