use crate::core_ftpcommand::CommandContext;
use crate::session::{LoginState, Session};
use log::info;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the PORT (Active Mode) FTP command: four address octets and
/// two port bytes, comma-separated. The connection itself is opened when
/// a transfer starts.
pub async fn handle_port_command(
    _writer: Arc<Mutex<TcpStream>>,
    _ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
    if session.state < LoginState::LoggedIn {
        return Ok("530 not logged in".to_string());
    }
    let parts: Vec<&str> = arg.trim().split(',').collect();
    if parts.len() < 6 {
        return Ok("501 syntax error".to_string());
    }
    let octets: Vec<u8> = parts[0..4]
        .iter()
        .filter_map(|x| x.trim().parse::<u8>().ok())
        .collect();
    if octets.len() != 4 {
        return Ok("501 syntax error".to_string());
    }
    let (high, low) = match (
        parts[4].trim().parse::<u16>(),
        parts[5].trim().parse::<u16>(),
    ) {
        (Ok(h), Ok(l)) if h <= 255 && l <= 255 => (h, l),
        _ => return Ok("501 syntax error".to_string()),
    };
    let ip = IpAddr::from([octets[0], octets[1], octets[2], octets[3]]);
    let port = (high << 8) | low;
    info!("received PORT for {}:{}", ip, port);

    session.data_peer = Some(SocketAddr::new(ip, port));
    session.passive = false;
    session.state = LoginState::DataReady;
    Ok("200 received PORT".to_string())
}

/// Handles the EPRT FTP command: delimiter-separated protocol, address
/// and port tokens.
pub async fn handle_eprt_command(
    _writer: Arc<Mutex<TcpStream>>,
    _ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
    if session.state < LoginState::LoggedIn {
        return Ok("530 not logged in".to_string());
    }
    let arg = arg.trim();
    let delim = match arg.chars().next() {
        Some(d) => d,
        None => return Ok("501 syntax error".to_string()),
    };
    let tokens: Vec<&str> = arg[delim.len_utf8()..]
        .split(delim)
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.len() < 3 {
        return Ok("501 syntax error".to_string());
    }
    // tokens[0] is the address family; the address speaks for itself
    let ip: IpAddr = match tokens[1].parse() {
        Ok(ip) => ip,
        Err(_) => return Ok("501 syntax error".to_string()),
    };
    let port: u16 = match tokens[2].parse() {
        Ok(p) => p,
        Err(_) => return Ok("501 syntax error".to_string()),
    };
    info!("received EPRT for {}:{}", ip, port);

    session.data_peer = Some(SocketAddr::new(ip, port));
    session.passive = false;
    session.state = LoginState::DataReady;
    Ok("200 received EPRT".to_string())
}
