use crate::core_ftpcommand::utils::{current_user, resolve_arg, Resolved};
use crate::core_ftpcommand::CommandContext;
use crate::core_network::data::{finish_data, open_data_connection};
use crate::core_vfs::invisible_file;
use crate::helpers::{decode_char, encode_char, fs_date, len_formatted, write_line};
use crate::session::{LoginState, Session};
use log::warn;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

pub async fn handle_list_command(
    writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    list(writer, ctx, session, arg, true).await
}

pub async fn handle_nlst_command(
    writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<String, std::io::Error> {
    list(writer, ctx, session, arg, false).await
}

/// Streams a directory listing over the data connection and reverts the
/// session to the logged-in state.
async fn list(
    writer: Arc<Mutex<TcpStream>>,
    ctx: Arc<CommandContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
    full: bool,
) -> Result<String, std::io::Error> {
    let mut session = session.lock().await;
    if session.state < LoginState::LoggedIn {
        return Ok("530 not logged in".to_string());
    }
    if session.state == LoginState::LoggedIn {
        return Ok("503 need PORT first".to_string());
    }
    let mut path = decode_char(&session.charcoding, arg.trim());
    if path.starts_with('-') {
        // someone probably tried a unix command option here; the listing
        // is close to ls -la anyway, so ignoring it is sufficient
        path.clear();
    }
    let resolved = match resolve_arg(&ctx, &session, &path) {
        Ok(r) => r,
        Err(reply) => return Ok(reply),
    };
    let listing = build_listing(&ctx, &session, &resolved, "", full);

    write_line(&writer, "150 opening ASCII data connection").await?;
    let mut data = match open_data_connection(&mut session, &ctx.config).await {
        Ok(d) => d,
        Err(e) => {
            warn!("could not open data connection for listing: {}", e);
            session.state = LoginState::LoggedIn;
            return Ok("425 can't open data connection".to_string());
        }
    };
    let result = data.write_all(listing.as_bytes()).await;
    data.shutdown().await.ok();
    finish_data(&mut session, &ctx.config);
    session.state = LoginState::LoggedIn;
    match result {
        Ok(()) => Ok("226 closing data connection".to_string()),
        Err(e) => {
            warn!("data connection error during listing: {}", e);
            Ok("426 connection closed; transfer aborted".to_string())
        }
    }
}

/// Renders a listing of the resolved path: one CRLF-terminated line per
/// visible entry, full lines in `ls -l` style or bare names for NLST.
pub fn build_listing(
    ctx: &CommandContext,
    session: &Session,
    resolved: &Resolved,
    prefix: &str,
    full: bool,
) -> String {
    let user = current_user(session);
    let may_read = ctx.store.can_read(&user);
    let may_write = ctx.store.can_write(&user);
    let usergroup = ctx.store.group(&user);
    let cfg = &ctx.config.server;
    let real = &resolved.real;

    if !real.is_dir() {
        let name = real
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return ls_file_line(
            real,
            &name,
            may_read,
            may_write,
            &usergroup,
            cfg.count_subdir,
            &cfg.curr_year_format,
            &cfg.prev_year_format,
            &session.charcoding,
        );
    }

    let mut buf = String::new();
    if real == resolved.vfs.root() && user == "anonymous" {
        buf.push_str(prefix);
        buf.push_str(&ls_notifier_line(
            &usergroup,
            &cfg.curr_year_format,
            &cfg.prev_year_format,
        ));
    }
    let mut names: Vec<String> = match std::fs::read_dir(real) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => return buf,
    };
    names.sort();
    for name in names {
        if invisible_file(&name) {
            continue;
        }
        let f = real.join(&name);
        if !f.exists() {
            continue;
        }
        buf.push_str(prefix);
        if full {
            buf.push_str(&ls_file_line(
                &f,
                &name,
                may_read,
                may_write,
                &usergroup,
                cfg.count_subdir,
                &cfg.curr_year_format,
                &cfg.prev_year_format,
                &session.charcoding,
            ));
        } else {
            buf.push_str(&name);
            buf.push_str("\r\n");
        }
    }
    buf
}

/// One `ls -l`-style line. The shown permission bits combine the user's
/// group permission with the file's own bits; a file the group may write
/// but the filesystem does not is reported read-only and owned by root.
#[allow(clippy::too_many_arguments)]
pub fn ls_file_line(
    path: &Path,
    name: &str,
    may_read: bool,
    may_write: bool,
    usergroup: &str,
    count_subdir: bool,
    curr_year_format: &str,
    prev_year_format: &str,
    charcoding: &Option<String>,
) -> String {
    let meta = std::fs::metadata(path).ok();
    let (is_dir, is_file, readable, writable, len, mtime) = match &meta {
        Some(m) => (
            m.is_dir(),
            m.is_file(),
            true,
            !m.permissions().readonly(),
            m.len(),
            m.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        ),
        None => (false, false, false, false, 0, SystemTime::UNIX_EPOCH),
    };

    let mut line = String::new();
    line.push(if is_dir {
        'd'
    } else if is_file {
        '-'
    } else {
        '?'
    });
    let mut perm = String::new();
    perm.push(if may_read && readable { 'r' } else { '-' });
    let owned_by_root = !(may_write && writable);
    perm.push(if owned_by_root { '-' } else { 'w' });
    perm.push(if is_dir { 'x' } else { '-' });
    line.push_str(&perm);
    line.push_str(&perm);
    line.push_str(&perm);
    line.push_str("   1 ");

    let group = group_column(if owned_by_root { "root" } else { usergroup });
    line.push_str(&group);
    line.push(' ');
    line.push_str(&group);

    let size = if is_dir {
        if count_subdir {
            std::fs::read_dir(path)
                .map(|entries| entries.count() as u64)
                .unwrap_or(0)
        } else {
            0
        }
    } else {
        len
    };
    line.push_str(&len_formatted(&format!(" {}", size), 11, true));
    line.push(' ');
    line.push_str(&fs_date(curr_year_format, prev_year_format, mtime));
    line.push(' ');
    line.push_str(&encode_char(charcoding, name));
    line.push_str("\r\n");
    line
}

/// Zero-length pseudo-entry advertising the server, shown to anonymous
/// users at the root.
pub fn ls_notifier_line(
    usergroup: &str,
    curr_year_format: &str,
    prev_year_format: &str,
) -> String {
    let group = group_column(usergroup);
    format!(
        "----------   1 {} {}{} {} {}\r\n",
        group,
        group,
        len_formatted(" 0", 11, true),
        fs_date(curr_year_format, prev_year_format, SystemTime::UNIX_EPOCH),
        "_ferroftpd_free_software"
    )
}

fn group_column(group: &str) -> String {
    let truncated: String = group.chars().take(8).collect();
    len_formatted(&truncated, 8, false)
}
