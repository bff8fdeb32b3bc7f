use crate::core_ftpcommand::utils::{current_user, resolve_arg};
use crate::core_ftpcommand::CommandContext;
use crate::helpers::decode_char;
use crate::session::{LoginState, Session};
use log::info;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the DELE FTP command, gated by the delete-file pre-hook.
pub async fn handle_dele_command(
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
    if !ctx.hooks.delete_file_pre(&current_user(&session)) {
        return Ok("550 no permission to delete".to_string());
    }
    if !resolved.real.is_dir() && std::fs::remove_file(&resolved.real).is_ok() {
        ctx.hooks.delete_file_post(&resolved.real);
        info!("deleted file {}", resolved.real.display());
        Ok(format!("250 {} deleted", resolved.virtual_path))
    } else {
        Ok(format!("550 \"{}\" bad path", path))
    }
}
