use crate::core_ftpcommand::utils::resolve_arg;
use crate::core_ftpcommand::CommandContext;
use crate::helpers::decode_char;
use crate::session::{LoginState, Session};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

pub async fn handle_size_command(
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
    match std::fs::metadata(&resolved.real) {
        Err(_) => Ok(format!("550 \"{}\" error: does not exist", path)),
        Ok(meta) if meta.is_dir() => Ok("213 -1".to_string()),
        Ok(meta) => Ok(format!("213 {}", meta.len())),
    }
}
