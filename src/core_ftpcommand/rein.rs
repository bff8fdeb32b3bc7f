use crate::core_ftpcommand::CommandContext;
use crate::session::Session;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

pub async fn handle_rein_command(
    _writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
    session.reinitialize(ctx.config.server.effective_charcoding());
    Ok("200 please login".to_string())
}
