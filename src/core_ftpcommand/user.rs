use crate::constants::USERNAME_REGEX;
use crate::core_ftpcommand::CommandContext;
use crate::session::{LoginState, Session};
use log::info;
use regex::Regex;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the USER FTP command.
///
/// Announces the account. Accounts whose configured password is empty are
/// logged in on the spot; everyone else is asked for a password. An
/// unknown name is accepted here and resolves to the guest group later.
pub async fn handle_user_command(
    _writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    let username = arg.trim().to_string();
    if username.is_empty() {
        return Ok("501 syntax error".to_string());
    }
    let re = Regex::new(USERNAME_REGEX).unwrap();
    if !re.is_match(&username) {
        return Ok("501 invalid user name".to_string());
    }

    let mut session = session.lock().await;
    session.username = Some(username.clone());

    match ctx.store.password(&username) {
        Some(pw) if pw.is_empty() => {
            session.state = LoginState::LoggedIn;
            info!("user \"{}\": logged in (no password required)", username);
            Ok("230 logged in".to_string())
        }
        _ => {
            session.state = LoginState::UserGiven;
            Ok("331 password required".to_string())
        }
    }
}
