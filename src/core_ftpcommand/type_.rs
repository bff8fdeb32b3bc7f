use crate::core_ftpcommand::CommandContext;
use crate::session::Session;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Any requested type is accepted, but transfers are always binary.
pub async fn handle_type_command(
    _writer: Arc<Mutex<TcpStream>>,
    _ctx: Arc<CommandContext>,
    _session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    if arg.trim().eq_ignore_ascii_case("I") {
        Ok("200 binary mode set".to_string())
    } else {
        Ok("200 transfers only in binary mode".to_string())
    }
}
