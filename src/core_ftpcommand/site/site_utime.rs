use crate::core_ftpcommand::utils::{current_user, resolve_arg};
use crate::core_ftpcommand::CommandContext;
use crate::helpers::split_args;
use crate::session::Session;
use chrono::NaiveDateTime;
use filetime::FileTime;
use std::sync::Arc;
use tokio::sync::Mutex;

/// SITE UTIME <filename> <access-time> <modify-time> <create-time> UTC.
///
/// Only the modify time is applied; access and create times cannot be
/// changed portably. The filename may contain spaces.
pub async fn handle_site_utime(
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    args: String,
) -> Result<String, std::io::Error> {
    let session = session.lock().await;
    if !ctx.store.can_write(&current_user(&session)) {
        return Ok("501 no permission to write".to_string());
    }
    let words = split_args(&args);
    if words.len() < 5 {
        return Ok(
            "501 missing parameter: SITE UTIME <file> <atime> <mtime> <ctime> UTC".to_string(),
        );
    }
    let filename = words[..words.len() - 4].join(" ");
    let mtime_arg = &words[words.len() - 3];

    let resolved = match resolve_arg(&ctx, &session, &filename) {
        Ok(r) => r,
        Err(reply) => return Ok(reply),
    };
    if !resolved.real.exists() {
        return Ok(format!(
            "501 SITE UTIME argument error: {} does not exist",
            resolved.virtual_path
        ));
    }
    if mtime_arg.len() != 14 {
        return Ok("501 UTIME date/time parameter syntax error: use yyyyMMddHHmmss".to_string());
    }
    let parsed = match NaiveDateTime::parse_from_str(mtime_arg, "%Y%m%d%H%M%S") {
        Ok(dt) => dt,
        Err(_) => {
            return Ok(
                "501 UTIME date/time parameter syntax error: use yyyyMMddHHmmss".to_string(),
            )
        }
    };
    let mtime = FileTime::from_unix_time(parsed.and_utc().timestamp(), 0);
    match filetime::set_file_mtime(&resolved.real, mtime) {
        Ok(()) => Ok(format!(
            "200 UTIME <modify-date> = {} applied to {}",
            mtime_arg, resolved.virtual_path
        )),
        Err(_) => Ok(format!("501 UTIME {} FAILED", resolved.virtual_path)),
    }
}
