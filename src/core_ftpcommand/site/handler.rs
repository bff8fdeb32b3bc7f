use crate::core_ftpcommand::site::{site_chmod, site_ls, site_shutdown, site_utime};
use crate::core_ftpcommand::utils::current_user;
use crate::core_ftpcommand::CommandContext;
use crate::helpers::{car, cdr, decode_char};
use crate::session::{LoginState, Session};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the SITE FTP command: a sub-dispatch of operator commands.
/// Mutating subcommands are gated by the write bit, SHUTDOWN and EXEC by
/// the exec bit.
pub async fn handle_site_command(
    _writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    {
        let session = session.lock().await;
        if session.state < LoginState::LoggedIn {
            return Ok("530 not logged in".to_string());
        }
    }
    let decoded = {
        let session = session.lock().await;
        decode_char(&session.charcoding, arg.trim())
    };
    let command = match car(&decoded) {
        Some(c) => c.to_uppercase(),
        None => return Ok("501 no arguments given for SITE. try SITE HELP.".to_string()),
    };
    let rest = cdr(&decoded).unwrap_or("").to_string();

    match command.as_str() {
        "HELP" => {
            let user = {
                let session = session.lock().await;
                current_user(&session)
            };
            let exec_note = if ctx.store.can_exec(&user) {
                "permission granted to use the SHUTDOWN command"
            } else {
                "the user must have set the exec flag in the groups file to use the SHUTDOWN command"
            };
            Ok(format!(
                concat!(
                    "200-Recognized SITE commands:\r\n",
                    " LS or DIR                          -- directory listing through terminal session\r\n",
                    " CHMOD uuu <path>                   -- change access right of <path>\r\n",
                    " SHUTDOWN                           -- shut down the host system\r\n",
                    " UTIME <filename> <access-time> <modify-time> <create-time> UTC;  <time>=yyyyMMddHHmmss\r\n",
                    "200 {}"
                ),
                exec_note
            ))
        }
        "CHMOD" => site_chmod::handle_site_chmod(ctx, session, rest).await,
        "UTIME" => site_utime::handle_site_utime(ctx, session, rest).await,
        "LS" | "DIR" => site_ls::handle_site_ls(ctx, session).await,
        "SHUTDOWN" => site_shutdown::handle_site_shutdown(ctx, session).await,
        "EXEC" => {
            let user = {
                let session = session.lock().await;
                current_user(&session)
            };
            if !ctx.store.can_exec(&user) {
                return Ok(
                    "530 no permission to exec for this user. set exec flag in the groups file"
                        .to_string(),
                );
            }
            Ok("501".to_string())
        }
        _ => Ok("501 SITE command parameter not implemented".to_string()),
    }
}
