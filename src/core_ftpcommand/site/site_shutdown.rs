use crate::core_ftpcommand::utils::current_user;
use crate::core_ftpcommand::CommandContext;
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

/// SITE SHUTDOWN: runs the host's shutdown script. Gated by the exec bit.
pub async fn handle_site_shutdown(
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
) -> Result<String, std::io::Error> {
    let session = session.lock().await;
    if !ctx.store.can_exec(&current_user(&session)) {
        return Ok(
            "530 no permission to exec for this user. set exec flag in the groups file"
                .to_string(),
        );
    }
    ctx.hooks.exec_quiet("sh", &["shutdown.script"]).await;
    Ok("200 shutdown initiated. future commands are void. goodby.".to_string())
}
