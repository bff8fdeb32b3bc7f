use crate::core_ftpcommand::CommandContext;
use crate::session::{LoginState, PenaltyAction, Session};
use log::{info, warn};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the PASS FTP command.
///
/// Verifies the password against the account table, then validates the
/// user's root directory before completing the login. A failed attempt
/// consults the penalty policy, which may delay the reply or drop the
/// connection outright.
pub async fn handle_pass_command(
    _writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
    if session.state != LoginState::UserGiven {
        return Ok("503 need USER first".to_string());
    }
    let user = match session.username.clone() {
        Some(u) => u,
        None => return Ok("503 need USER first".to_string()),
    };

    let pw = ctx.store.password(&user);
    let accepted = match &pw {
        None => false,
        Some(p) => p.is_empty() || p == "*" || arg == *p,
    };
    if !accepted {
        session.wrong_login();
        match session.penalty_login() {
            PenaltyAction::Disconnect => return Ok("!221 goodbye".to_string()),
            PenaltyAction::Wait(wait) => {
                warn!("user \"{}\": attempt to log in denied", user);
                session.state = LoginState::Unauthenticated;
                if !wait.is_zero() {
                    tokio::time::sleep(wait).await;
                }
                return Ok("530 authorization failed. not logged in".to_string());
            }
        }
    }

    session.current_dir = String::from("/");
    let root = match ctx.store.root(&user) {
        Some(root) => root,
        None => {
            session.wrong_login();
            warn!("user \"{}\": log in denied, no home path assigned", user);
            session.state = LoginState::Unauthenticated;
            return Ok("530 home directory does not exist. not logged in".to_string());
        }
    };

    if root.is_absolute() && !root.exists() && ctx.store.can_write(&user) {
        // create the group root on-the-fly for a writable group
        if tokio::fs::create_dir_all(&root).await.is_ok() {
            warn!(
                "ATTENTION: the path \"{}\" for the group \"{}\" has been generated",
                root.display(),
                ctx.store.group(&user)
            );
        }
    }

    let readable = std::fs::read_dir(&root).is_ok();
    if !root.is_absolute() || !root.is_dir() || !readable {
        session.wrong_login();
        warn!(
            "user \"{}\": log in denied, no home path \"{}\"",
            user,
            root.display()
        );
        session.state = LoginState::Unauthenticated;
        return Ok("530 home directory does not exist. not logged in".to_string());
    }

    session.login_attempts = 0;
    session.state = LoginState::LoggedIn;
    info!("user \"{}\": logged in", user);
    info!("root for user \"{}\": {}", user, root.display());
    Ok("230 logged in".to_string())
}
