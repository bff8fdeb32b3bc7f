use crate::core_ftpcommand::CommandContext;
use crate::helpers::{decode_char, split_args};
use crate::session::{LoginState, Session};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the OPTS FTP command: stores arbitrary option pairs and
/// recognizes the UTF-8 encoding toggle.
pub async fn handle_opts_command(
    _writer: Arc<Mutex<TcpStream>>,
    _ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
    if session.state < LoginState::LoggedIn {
        return Ok("530 not logged in".to_string());
    }
    let args = split_args(&decode_char(&session.charcoding, &arg));
    if args.is_empty() {
        return Ok("501 no arguments given for OPTS".to_string());
    }
    if args.len() > 2 {
        return Ok("501 too many arguments given for OPTS".to_string());
    }
    let key = args[0].to_uppercase();
    let value = args.get(1).map(|v| v.to_uppercase());
    session.opts.insert(key, value);
    if session.opts.contains_key("UTF-8") || session.opts.contains_key("UTF8") {
        session.charcoding = Some("UTF-8".to_string());
    }
    Ok("200 property set".to_string())
}

/// Handles the bare UTF8 command, a shortcut for OPTS UTF8 ON.
pub async fn handle_utf8_command(
    _writer: Arc<Mutex<TcpStream>>,
    _ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
    session
        .opts
        .insert("UTF-8".to_string(), Some("ON".to_string()));
    session.charcoding = Some("UTF-8".to_string());
    Ok("200 UTF-8 active".to_string())
}
