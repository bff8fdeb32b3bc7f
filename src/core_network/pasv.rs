use crate::constants::PASV_BIND_BACKOFF;
use crate::core_ftpcommand::CommandContext;
use crate::session::{LoginState, Session};
use log::{debug, warn};
use std::net::IpAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

/// Handles the PASV FTP command: binds (or reuses) a listening data
/// socket and reports it as four address bytes and two port bytes.
pub async fn handle_pasv_command(
    writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
    if session.state < LoginState::LoggedIn {
        return Ok("530 not logged in".to_string());
    }
    let port = bind_passive(&ctx, &mut session).await?;
    let ip = report_address(&ctx, &writer).await?;
    let octets = match ip {
        IpAddr::V4(v4) => v4.octets(),
        IpAddr::V6(_) => {
            // PASV cannot encode a v6 address; the client has EPSV for that
            return Ok("425 can't open data connection".to_string());
        }
    };

    session.passive = true;
    session.state = LoginState::DataReady;
    Ok(format!(
        "227 Entering Passive Mode ({},{},{},{},{},{})",
        octets[0],
        octets[1],
        octets[2],
        octets[3],
        port >> 8,
        port & 0xff
    ))
}

/// Handles the EPSV FTP command; the optional net-prt argument is not
/// needed here.
pub async fn handle_epsv_command(
    _writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
    if session.state < LoginState::LoggedIn {
        return Ok("530 not logged in".to_string());
    }
    let port = bind_passive(&ctx, &mut session).await?;
    session.passive = true;
    session.state = LoginState::DataReady;
    Ok(format!("229 Entering Extended Passive Mode (|||{}|)", port))
}

/// Binds the passive listener. A fixed configured port is reused while
/// the previous listener still holds it; bind failures retry with an
/// incremented port (ephemeral) or a backoff (fixed).
async fn bind_passive(ctx: &CommandContext, session: &mut Session) -> Result<u16, std::io::Error> {
    let fixed = ctx.config.server.data_port;
    if fixed != 0 {
        if let Some(listener) = &session.pasv_listener {
            if listener.local_addr()?.port() == fixed {
                debug!("reusing passive listener on port {}", fixed);
                return Ok(fixed);
            }
        }
    }
    let mut port = fixed;
    let listener = loop {
        match TcpListener::bind(("0.0.0.0", port)).await {
            Ok(listener) => break listener,
            Err(e) => {
                warn!("passive bind on port {} failed: {}", port, e);
                if fixed == 0 {
                    port += 1;
                } else {
                    tokio::time::sleep(PASV_BIND_BACKOFF).await;
                }
            }
        }
    };
    let port = listener.local_addr()?.port();
    debug!("passive listener bound on port {}", port);
    session.pasv_listener = Some(listener);
    Ok(port)
}

/// The address reported in the PASV reply: the configured override, or
/// the control socket's own local address.
async fn report_address(
    ctx: &CommandContext,
    writer: &Arc<Mutex<TcpStream>>,
) -> Result<IpAddr, std::io::Error> {
    if let Some(configured) = &ctx.config.server.pasv_address {
        if let Ok(ip) = configured.parse() {
            return Ok(ip);
        }
        warn!("unparseable pasv_address \"{}\", using local address", configured);
    }
    let writer = writer.lock().await;
    Ok(writer.local_addr()?.ip())
}
