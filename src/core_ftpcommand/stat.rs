use crate::core_ftpcommand::utils::current_user;
use crate::core_ftpcommand::CommandContext;
use crate::session::{LoginState, Session};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the STAT FTP command: a multi-line status of the control
/// connection and login.
pub async fn handle_stat_command(
    writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<String, std::io::Error> {
    let session = session.lock().await;
    let mut buf = String::from("211-ferroftpd status:\r\n");
    buf.push_str(&format!(
        "     connected to {}\r\n",
        session.peer_addr.ip()
    ));
    buf.push_str("     control socket options:");
    {
        let writer = writer.lock().await;
        if writer.nodelay().unwrap_or(false) {
            buf.push_str(" tcp_nodelay");
        }
        if let Ok(Some(linger)) = writer.linger() {
            buf.push_str(&format!(" so_linger {}", linger.as_secs()));
        }
    }
    let timeout = ctx.config.server.control_timeout_secs;
    if timeout > 0 {
        buf.push_str(&format!(" so_timeout {} seconds", timeout));
    }
    buf.push_str("\r\n");
    if session.state >= LoginState::LoggedIn {
        buf.push_str(&format!("     logged in as {}\r\n", current_user(&session)));
        buf.push_str("     type binary\r\n");
    }
    buf.push_str("211 end of status");
    Ok(buf)
}
