use crate::core_ftpcommand::CommandContext;
use crate::session::Session;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

pub async fn handle_quit_command(
    _writer: Arc<Mutex<TcpStream>>,
    _ctx: Arc<CommandContext>,
    _session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<String, std::io::Error> {
    Ok("!221 goodbye".to_string())
}
