use crate::core_ftpcommand::utils::{current_user, resolve_arg};
use crate::core_ftpcommand::CommandContext;
use crate::helpers::decode_char;
use crate::session::{LoginState, Session};
use log::info;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the RNTO FTP command: completes a rename prepared by RNFR.
pub async fn handle_rnto_command(
    _writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
    if session.state < LoginState::LoggedIn {
        return Ok("530 not logged in".to_string());
    }
    let from_virtual = match session.rename_from.clone() {
        Some(v) => v,
        None => return Ok("503 need RNFR first".to_string()),
    };
    let path = decode_char(&session.charcoding, arg.trim());
    if path.is_empty() {
        return Ok("553 syntax error".to_string());
    }
    let to = match resolve_arg(&ctx, &session, &path) {
        Ok(r) => r,
        Err(reply) => return Ok(reply),
    };
    let from = match to.vfs.resolve(&from_virtual) {
        Ok(p) => p,
        Err(_) => return Ok("550 illegal internal path".to_string()),
    };
    if !ctx.hooks.rename_pre(&current_user(&session)) {
        return Ok("550 no write permission".to_string());
    }
    if to.real.exists() {
        return Ok(format!("553 \"{}\" already exists", path));
    }
    if std::fs::rename(&from, &to.real).is_ok() {
        ctx.hooks.rename_post(&to.real);
        session.rename_from = None;
        info!("renamed {} to {}", from.display(), to.real.display());
        Ok(format!(
            "250 \"{}\" renamed to \"{}\"",
            from_virtual, to.virtual_path
        ))
    } else {
        Ok("553 rename failed".to_string())
    }
}
