use crate::core_ftpcommand::utils::resolve_arg;
use crate::core_ftpcommand::CommandContext;
use crate::helpers::decode_char;
use crate::session::{LoginState, Session};
use log::debug;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the CWD FTP command.
///
/// The target must exist, be a directory and be readable before the new
/// working directory is committed.
pub async fn handle_cwd_command(
    _writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
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
    let readable = std::fs::read_dir(&resolved.real).is_ok();
    if !resolved.real.is_dir() || !readable {
        return Ok(format!("550 \"{}\" bad path", path));
    }
    session.current_dir = resolved.virtual_path;
    debug!("new server-path {}", resolved.real.display());
    Ok(format!(
        "250 \"{}\" is working directory",
        session.current_dir
    ))
}
