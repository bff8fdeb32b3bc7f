use crate::core_ftpcommand::CommandContext;
use crate::session::Session;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// The "UNIX Type:" prefix is fixed; clients misunderstand anything else.
pub async fn handle_syst_command(
    _writer: Arc<Mutex<TcpStream>>,
    _ctx: Arc<CommandContext>,
    _session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<String, std::io::Error> {
    Ok(format!(
        "215 UNIX Type: {} {}, ferroftpd v{}",
        std::env::consts::ARCH,
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    ))
}
