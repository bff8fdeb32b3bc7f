use crate::core_ftpcommand::list::build_listing;
use crate::core_ftpcommand::utils::{current_user, resolve_arg};
use crate::core_ftpcommand::CommandContext;
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// SITE LS / SITE DIR: a listing of the working directory over the
/// control channel, no data connection involved.
pub async fn handle_site_ls(
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
) -> Result<String, std::io::Error> {
    let session = session.lock().await;
    if !ctx.store.can_read(&current_user(&session)) {
        return Ok("501 no permission to read".to_string());
    }
    let resolved = match resolve_arg(&ctx, &session, "") {
        Ok(r) => r,
        Err(reply) => return Ok(reply),
    };
    let listing = build_listing(&ctx, &session, &resolved, " ", true);
    Ok(format!("200-\r\n{}200", listing))
}
