use crate::core_ftpcommand::CommandContext;
use crate::session::{LoginState, Session};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

pub async fn handle_pwd_command(
    _writer: Arc<Mutex<TcpStream>>,
    _ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<String, std::io::Error> {
    let session = session.lock().await;
    if session.state < LoginState::LoggedIn {
        return Ok("530 not logged in".to_string());
    }
    Ok(format!(
        "257 \"{}\" is working directory",
        session.current_dir
    ))
}
