use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::initialize_command_handlers;
use crate::core_ftpcommand::CommandContext;
use crate::core_hooks::{NoopMacMetadata, SessionHooks};
use crate::core_permissions::PermissionStore;
use crate::helpers::write_line;
use crate::session::Session;
use crate::watchdog::{self, SessionRegistry};
use crate::Config;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::time::timeout;

/// Binds the control listener and runs the accept loop: one spawned
/// worker per connection, bounded by the configured session maximum.
/// A bind failure is fatal; per-connection errors never reach this loop.
pub async fn start_server(config: Arc<Config>, store: Arc<PermissionStore>) -> Result<()> {
    let port = config.server.listen_port;
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("cannot bind listening port {}", port))?;
    info!("server listening on port {}", port);

    let registry = Arc::new(SessionRegistry::new());
    watchdog::start_watchdog(
        Arc::clone(&registry),
        config.server.term_sleeping_sessions,
    );

    let hooks = Arc::new(SessionHooks::new(
        Arc::clone(&config),
        Arc::clone(&store),
        Arc::new(NoopMacMetadata),
    ));
    let ctx = Arc::new(CommandContext {
        config: Arc::clone(&config),
        store,
        hooks,
    });

    loop {
        debug!(
            "waiting for connections, {} sessions running",
            registry.running()
        );
        let (socket, addr) = listener.accept().await?;
        info!("new connection from {}", addr);

        let id = registry.begin();
        let worker_ctx = Arc::clone(&ctx);
        let worker_registry = Arc::clone(&registry);
        let handle = tokio::spawn(async move {
            if let Err(e) =
                handle_connection(socket, addr, worker_ctx, Arc::clone(&worker_registry), id).await
            {
                warn!("connection error for {}: {:?}", addr, e);
            }
            info!("session terminated for {}", addr);
            worker_registry.end(id);
        });
        registry.attach(id, handle.abort_handle());

        // idle until the number of sessions is below the maximum again
        let max = config.server.max_sessions;
        while max > 0 && registry.running() >= max {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}

/// Drives one control connection: greeting, then the command loop. A
/// failing command becomes a reply line and the session continues; only
/// a dead control socket ends the worker.
pub async fn handle_connection(
    socket: TcpStream,
    addr: SocketAddr,
    ctx: Arc<CommandContext>,
    registry: Arc<SessionRegistry>,
    id: u64,
) -> Result<()> {
    let clients = &ctx.config.server.clients;
    if clients.len() > 1 && !clients.contains(&addr.ip().to_string()) {
        warn!("CONNECTION ATTEMPT FROM {} DENIED", addr.ip());
        return Ok(());
    }
    info!("session started for {}", addr);

    let socket = Arc::new(Mutex::new(socket));
    write_line(&socket, &format!("220-{}", ctx.config.server.welcome)).await?;
    write_line(
        &socket,
        &format!(" ferroftpd v{}", env!("CARGO_PKG_VERSION")),
    )
    .await?;
    write_line(
        &socket,
        &format!(
            " System: {} {}",
            std::env::consts::ARCH,
            std::env::consts::OS
        ),
    )
    .await?;
    write_line(&socket, "220 ready").await?;

    let handlers = initialize_command_handlers();
    let session = Arc::new(Mutex::new(Session::new(
        addr,
        ctx.config.server.effective_charcoding(),
    )));
    let timeout_secs = ctx.config.server.control_timeout_secs;

    loop {
        let line = match read_command_line(&socket, timeout_secs).await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("client {} disconnected", addr);
                break;
            }
            Err(e) => {
                debug!("control channel error for {}: {}", addr, e);
                break;
            }
        };
        registry.touch(id);

        let (verb, arg) = match line.find(' ') {
            Some(pos) => (
                line[..pos].trim().to_uppercase(),
                line[pos..].trim().to_string(),
            ),
            None => (line.trim().to_uppercase(), String::new()),
        };
        if verb == "PASS" {
            debug!("{} < PASS ********", addr);
        } else {
            debug!("{} < {}", addr, line);
        }

        let reply = match FtpCommand::from_str(&verb).and_then(|cmd| handlers.get(&cmd)) {
            None => "502 command not implemented".to_string(),
            Some(handler) => {
                match handler(
                    Arc::clone(&socket),
                    Arc::clone(&ctx),
                    Arc::clone(&session),
                    arg,
                )
                .await
                {
                    Ok(reply) => reply,
                    // whatever happens: the worker has to survive
                    Err(e) if e.kind() == ErrorKind::TimedOut => "450 i/o timeout".to_string(),
                    Err(e) => format!("550 {}", e),
                }
            }
        };

        // a leading '!' asks for the reply to be sent, then the hangup
        let terminate = reply.starts_with('!');
        let reply = if terminate {
            reply[1..].to_string()
        } else {
            reply
        };
        debug!("{} > {}", addr, reply);
        write_line(&socket, &reply).await?;
        if terminate {
            break;
        }
    }
    Ok(())
}

/// Reads one CRLF-terminated command line byte by byte; control bytes
/// are dropped. `timeout_secs` bounds each read, 0 means unlimited.
/// `None` signals a closed connection.
async fn read_command_line(
    socket: &Arc<Mutex<TcpStream>>,
    timeout_secs: u64,
) -> std::io::Result<Option<String>> {
    let mut buf: Vec<u8> = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let mut locked = socket.lock().await;
        let n = if timeout_secs > 0 {
            timeout(Duration::from_secs(timeout_secs), locked.read(&mut byte))
                .await
                .map_err(|_| {
                    std::io::Error::new(ErrorKind::TimedOut, "control read timed out")
                })??
        } else {
            locked.read(&mut byte).await?
        };
        drop(locked);
        if n == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            break;
        }
        match byte[0] {
            b'\n' => break,
            b if b > 31 => buf.push(b),
            _ => {}
        }
    }
    Ok(Some(String::from_utf8_lossy(&buf).to_string()))
}
