use crate::core_ftpcommand::utils::resolve_arg;
use crate::core_ftpcommand::CommandContext;
use crate::helpers::decode_char;
use crate::session::{LoginState, Session};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the RNFR FTP command: records the rename source for RNTO.
/// A nonexistent source records nothing.
pub async fn handle_rnfr_command(
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
    if resolved.real.exists() {
        let reply = format!("350 send RNTO to rename \"{}\"", resolved.virtual_path);
        session.rename_from = Some(resolved.virtual_path);
        Ok(reply)
    } else {
        Ok(format!("550 file \"{}\" does not exist", path))
    }
}
