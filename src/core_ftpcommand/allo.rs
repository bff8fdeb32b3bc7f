use crate::core_ftpcommand::CommandContext;
use crate::session::Session;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// ALLO needs no action; storage is allocated on demand.
pub async fn handle_allo_command(
    _writer: Arc<Mutex<TcpStream>>,
    _ctx: Arc<CommandContext>,
    _session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<String, std::io::Error> {
    Ok("200 ok".to_string())
}
