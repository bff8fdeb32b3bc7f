use crate::core_ftpcommand::CommandContext;
use crate::session::Session;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

pub async fn handle_feat_command(
    _writer: Arc<Mutex<TcpStream>>,
    _ctx: Arc<CommandContext>,
    _session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<String, std::io::Error> {
    Ok(concat!(
        "211-Recognized extended commands:\r\n",
        " MDTM\r\n",
        " MFMT\r\n",
        " SIZE\r\n",
        " UTF8\r\n",
        "211 end"
    )
    .to_string())
}
