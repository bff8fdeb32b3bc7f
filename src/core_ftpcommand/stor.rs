use crate::core_ftpcommand::utils::{current_user, resolve_arg};
use crate::core_ftpcommand::CommandContext;
use crate::core_network::data::{copy_data, finish_data, open_data_connection};
use crate::helpers::{decode_char, write_line};
use crate::session::{LoginState, Session};
use log::warn;
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the STOR FTP command.
///
/// Receives a file over the negotiated data connection. Gated by the
/// upload pre-hook; the post-hook reports throughput and applies the
/// configured file modes when the server runs on a privileged port.
pub async fn handle_stor_command(
    writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
    if session.state < LoginState::LoggedIn {
        return Ok("530 not logged in".to_string());
    }
    if session.state == LoginState::LoggedIn {
        return Ok("503 need PORT first".to_string());
    }
    let path = decode_char(&session.charcoding, arg.trim());
    if path.is_empty() {
        return Ok("501 syntax error".to_string());
    }
    let resolved = match resolve_arg(&ctx, &session, &path) {
        Ok(r) => r,
        Err(reply) => return Ok(reply),
    };
    let user = current_user(&session);
    let started = match ctx.hooks.upload_pre(&user) {
        Some(t) => t,
        None => return Ok("532 no write permission".to_string()),
    };
    if resolved.real.is_dir() {
        return Ok(format!("550 \"{}\" bad path", path));
    }

    let mut file = match tokio::fs::File::create(&resolved.real).await {
        Ok(f) => f,
        Err(e) => {
            warn!("failed to create {}: {}", resolved.real.display(), e);
            return Ok(match e.kind() {
                ErrorKind::NotFound => format!("550 \"{}\" bad path", path),
                ErrorKind::PermissionDenied => "550 permission denied".to_string(),
                _ => "451 requested action aborted. local error in processing".to_string(),
            });
        }
    };

    write_line(&writer, "125 opening BINARY data connection").await?;
    let mut data = match open_data_connection(&mut session, &ctx.config).await {
        Ok(d) => d,
        Err(e) => {
            warn!("could not open data connection for STOR: {}", e);
            session.state = LoginState::LoggedIn;
            return Ok("425 can't open data connection".to_string());
        }
    };

    let copied = copy_data(&mut data, &mut file, ctx.config.server.data_timeout_secs).await;
    file.flush().await.ok();
    data.shutdown().await.ok();
    finish_data(&mut session, &ctx.config);
    session.state = LoginState::LoggedIn;

    match copied {
        Ok(n) => {
            ctx.hooks.upload_post(&resolved.real, n, started).await;
            Ok(format!(
                "226 closing data connection for {}, {} bytes",
                resolved.virtual_path, n
            ))
        }
        Err(e) => {
            warn!("data connection error during STOR: {}", e);
            Ok("426 connection closed; transfer aborted".to_string())
        }
    }
}
