use crate::core_ftpcommand::CommandContext;
use crate::core_vfs::parent_virtual;
use crate::session::{LoginState, Session};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the CDUP FTP command. At the virtual root this is a no-op,
/// reported distinctly.
pub async fn handle_cdup_command(
    _writer: Arc<Mutex<TcpStream>>,
    _ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
    if session.state < LoginState::LoggedIn {
        return Ok("530 not logged in".to_string());
    }
    if session.current_dir == "/" {
        return Ok("250 \"/\" is root directory".to_string());
    }
    session.current_dir = parent_virtual(&session.current_dir);
    Ok(format!(
        "250 \"{}\" is working directory",
        session.current_dir
    ))
}
