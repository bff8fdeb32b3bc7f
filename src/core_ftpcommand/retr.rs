use crate::core_ftpcommand::utils::{current_user, resolve_arg, Resolved};
use crate::core_ftpcommand::CommandContext;
use crate::core_network::data::{copy_data, finish_data, open_data_connection};
use crate::helpers::{decode_char, write_line};
use crate::session::{LoginState, Session};
use log::warn;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the RETR FTP command.
///
/// Streams a file over the negotiated data connection. Gated by the
/// download pre-hook; the post-hook reports elapsed time and byte count.
/// When enabled, a missing index.html is generated on the fly from the
/// directory contents and served without ever touching the disk.
pub async fn handle_retr_command(
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
    let started = match ctx.hooks.download_pre(&user) {
        Some(t) => t,
        None => return Ok("550 no read permission".to_string()),
    };

    let wants_index = resolved
        .real
        .file_name()
        .map(|n| n.to_string_lossy().eq_ignore_ascii_case("index.html"))
        .unwrap_or(false);
    let index = if wants_index && !resolved.real.exists() && ctx.config.server.create_index {
        create_index(&resolved).ok()
    } else {
        None
    };

    if index.is_none() && !resolved.real.is_file() {
        return Ok(format!("550 \"{}\" bad path", path));
    }
    let filelength = match &index {
        Some(bytes) => bytes.len() as u64,
        None => match std::fs::metadata(&resolved.real) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(format!("550 \"{}\" bad path", path)),
        },
    };

    write_line(
        &writer,
        &format!(
            "150 opening BINARY data connection for {}, {} bytes",
            resolved.virtual_path, filelength
        ),
    )
    .await?;

    let mut data = match open_data_connection(&mut session, &ctx.config).await {
        Ok(d) => d,
        Err(e) => {
            warn!("could not open data connection for RETR: {}", e);
            session.state = LoginState::LoggedIn;
            return Ok("425 can't open data connection".to_string());
        }
    };

    let timeout = ctx.config.server.data_timeout_secs;
    let result = match &index {
        Some(bytes) => data.write_all(bytes).await.map(|_| bytes.len() as u64),
        None => match tokio::fs::File::open(&resolved.real).await {
            Ok(mut file) => copy_data(&mut file, &mut data, timeout).await,
            Err(e) => Err(e),
        },
    };
    data.shutdown().await.ok();
    finish_data(&mut session, &ctx.config);
    session.state = LoginState::LoggedIn;

    match result {
        Ok(_) => {
            ctx.hooks.download_post(&resolved.real, filelength, started);
            Ok("226 closing data connection".to_string())
        }
        Err(e) => {
            warn!("data connection error during RETR: {}", e);
            Ok("426 connection closed; transfer aborted".to_string())
        }
    }
}

/// Generates the virtual index.html: an HTML listing of the parent
/// directory. The file appears to exist for the client but is never
/// created in the host filesystem.
fn create_index(resolved: &Resolved) -> Result<Vec<u8>, std::io::Error> {
    use std::io::{Error, ErrorKind};
    let parent = resolved
        .real
        .parent()
        .ok_or_else(|| Error::new(ErrorKind::InvalidInput, "index path inappropriate"))?;
    let client_path = resolved
        .vfs
        .virtual_of(parent)
        .map_err(|_| Error::new(ErrorKind::InvalidInput, "index path inappropriate"))?;
    let href_prefix = if client_path == "/" {
        String::from("/")
    } else {
        format!("{}/", client_path)
    };

    let mut names: Vec<String> = std::fs::read_dir(parent)?
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let mut bb = String::new();
    bb.push_str(&format!("<TITLE>DIRECTORY OF {}</TITLE>\r\n", client_path));
    bb.push_str("<!-- generated by ferroftpd -->\r\n");
    bb.push_str(&format!("<H2>CURRENT PATH IS {}</H2>\r\n", client_path));
    bb.push_str("<PRE>\r\n");
    for name in names {
        let f = parent.join(&name);
        let (href, label) = if f.is_dir() {
            (format!("{}{}/index.html", href_prefix, name), format!("{}/", name))
        } else {
            let len = std::fs::metadata(&f).map(|m| m.len()).unwrap_or(0);
            (
                format!("{}{}", href_prefix, name),
                format!("{} [{} bytes]", name, len),
            )
        };
        bb.push_str(&format!("<A HREF=\"{}\">{}</A>\r\n", href, label));
    }
    bb.push_str("</PRE>");
    Ok(bb.into_bytes())
}
