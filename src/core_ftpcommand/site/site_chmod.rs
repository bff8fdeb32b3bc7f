use crate::core_ftpcommand::utils::{current_user, resolve_arg};
use crate::core_ftpcommand::CommandContext;
use crate::helpers::{car, cdr};
use crate::session::Session;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// SITE CHMOD uuu <path>.
///
/// The three digits collapse to read/write intent; the change is first
/// attempted through the file API, then through a system chmod. Success
/// and file-op failure are reported distinctly from a syntax error.
pub async fn handle_site_chmod(
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    args: String,
) -> Result<String, std::io::Error> {
    let session = session.lock().await;
    if !ctx.store.can_write(&current_user(&session)) {
        return Ok("501 no permission to write".to_string());
    }
    let mode = match car(&args) {
        Some(m) => m.to_string(),
        None => return Ok("501 SITE CHMOD command syntax error".to_string()),
    };
    let path = match cdr(&args) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => return Ok("501 SITE CHMOD command syntax error".to_string()),
    };
    if mode.len() != 3 || !mode.chars().all(|c| c.is_ascii_digit()) {
        return Ok("501 SITE CHMOD command syntax error".to_string());
    }
    let resolved = match resolve_arg(&ctx, &session, &path) {
        Ok(r) => r,
        Err(reply) => return Ok(reply),
    };
    if !resolved.real.exists() {
        return Ok(format!(
            "501 SITE CHMOD argument error: {} does not exist",
            resolved.virtual_path
        ));
    }

    // collapse the triad: any read bit grants read, any write bit write
    let digits: Vec<u32> = mode.chars().filter_map(|c| c.to_digit(8)).collect();
    if digits.len() != 3 {
        return Ok("501 SITE CHMOD command syntax error".to_string());
    }
    let shall_read = digits.iter().any(|d| d & 4 != 0);
    let shall_write = digits.iter().any(|d| d & 2 != 0);
    let digit = (if shall_read { 4 } else { 0 }) + (if shall_write { 2 } else { 0 });
    let mode = format!("{0}{0}{0}", digit);

    if matches_intent(&resolved.real, shall_write) {
        return Ok(format!(
            "200 CHMOD {} {} superfluous",
            mode, resolved.virtual_path
        ));
    }

    // the file API can only drop the write bit
    if !shall_write {
        if let Ok(meta) = std::fs::metadata(&resolved.real) {
            let mut perms = meta.permissions();
            perms.set_readonly(true);
            std::fs::set_permissions(&resolved.real, perms).ok();
        }
    }
    if matches_intent(&resolved.real, shall_write) {
        return Ok(format!(
            "200 CHMOD {} {} done by file attribute",
            mode, resolved.virtual_path
        ));
    }

    let target = resolved.real.to_string_lossy().to_string();
    ctx.hooks
        .exec_quiet("chmod", &[mode.as_str(), target.as_str()])
        .await;
    if matches_intent(&resolved.real, shall_write) {
        return Ok(format!(
            "200 CHMOD {} {} done by system exec",
            mode, resolved.virtual_path
        ));
    }

    Ok(format!(
        "501 CHMOD {} {} not successful (syntax ok, file op failed)",
        mode, resolved.virtual_path
    ))
}

fn matches_intent(path: &Path, shall_write: bool) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => !meta.permissions().readonly() == shall_write,
        Err(_) => false,
    }
}
