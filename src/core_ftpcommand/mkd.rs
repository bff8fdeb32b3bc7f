use crate::core_ftpcommand::utils::{current_user, resolve_arg};
use crate::core_ftpcommand::CommandContext;
use crate::helpers::decode_char;
use crate::session::{LoginState, Session};
use log::info;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the MKD (and XMKD) FTP command, gated by the make-folder
/// pre-hook.
pub async fn handle_mkd_command(
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
    if !ctx.hooks.make_folder_pre(&current_user(&session)) {
        return Ok("550 no write permission".to_string());
    }
    if !resolved.real.exists() && std::fs::create_dir(&resolved.real).is_ok() {
        ctx.hooks.make_folder_post(&resolved.real).await;
        info!("created directory {}", resolved.real.display());
        Ok(format!("250 {} created", resolved.virtual_path))
    } else {
        Ok(format!("550 \"{}\" bad path", path))
    }
}
