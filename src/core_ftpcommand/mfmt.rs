use crate::core_ftpcommand::utils::{current_user, resolve_arg};
use crate::core_ftpcommand::CommandContext;
use crate::helpers::{decode_char, split_args};
use crate::session::{LoginState, Session};
use chrono::NaiveDateTime;
use filetime::FileTime;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the MFMT FTP command: sets a file's modification time from a
/// fixed 14-digit yyyyMMddHHmmss timestamp. Requires write permission.
pub async fn handle_mfmt_command(
    _writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    let session = session.lock().await;
    if session.state < LoginState::LoggedIn {
        return Ok("530 not logged in".to_string());
    }
    if !ctx.store.can_write(&current_user(&session)) {
        return Ok("501 no permission to write".to_string());
    }
    let args = split_args(&decode_char(&session.charcoding, &arg));
    if args.len() != 2 {
        return Ok("501 missing parameter: MFMT yyyyMMddHHmmss <file>".to_string());
    }
    let resolved = match resolve_arg(&ctx, &session, &args[1]) {
        Ok(r) => r,
        Err(reply) => return Ok(reply),
    };
    if !resolved.real.exists() {
        return Ok(format!(
            "501 MFMT argument error: {} does not exist",
            resolved.virtual_path
        ));
    }
    if args[0].len() != 14 {
        return Ok("501 MFMT date/time parameter syntax error: use yyyyMMddHHmmss".to_string());
    }
    let parsed = match NaiveDateTime::parse_from_str(&args[0], "%Y%m%d%H%M%S") {
        Ok(dt) => dt,
        Err(_) => {
            return Ok(
                "501 MFMT date/time parameter syntax error: use yyyyMMddHHmmss".to_string(),
            )
        }
    };
    let mtime = FileTime::from_unix_time(parsed.and_utc().timestamp(), 0);
    match filetime::set_file_mtime(&resolved.real, mtime) {
        Ok(()) => Ok(format!(
            "213 ModifyTime={} {}",
            args[0], resolved.virtual_path
        )),
        Err(_) => Ok(format!(
            "501 MFMT {} {} FAILED",
            args[0], resolved.virtual_path
        )),
    }
}
