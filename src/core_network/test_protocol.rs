use crate::core_ftpcommand::CommandContext;
use crate::core_hooks::{NoopMacMetadata, SessionHooks};
use crate::core_network::network::handle_connection;
use crate::core_permissions::PermissionStore;
use crate::session::{PenaltyAction, Session};
use crate::watchdog::SessionRegistry;
use crate::Config;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

struct TestServer {
    addr: SocketAddr,
    root: PathBuf,
    _dir: tempfile::TempDir,
}

/// Starts an in-process server on an ephemeral localhost port. `{ROOT}`
/// in the group table is replaced with a fresh home directory.
async fn start_test_server(groups: &str, accounts: &str) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("home");
    std::fs::create_dir_all(&root).unwrap();

    let groups_path = dir.path().join("ftpd.groups");
    let accounts_path = dir.path().join("ftpd.accounts");
    std::fs::write(&groups_path, groups.replace("{ROOT}", root.to_str().unwrap())).unwrap();
    std::fs::write(&accounts_path, accounts).unwrap();

    let config = Arc::new(Config::default());
    let store = Arc::new(PermissionStore::new(&groups_path, &accounts_path));
    store.load_permissions().unwrap();
    let hooks = Arc::new(SessionHooks::new(
        Arc::clone(&config),
        Arc::clone(&store),
        Arc::new(NoopMacMetadata),
    ));
    let ctx = Arc::new(CommandContext {
        config,
        store,
        hooks,
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let registry = Arc::new(SessionRegistry::new());
    tokio::spawn(async move {
        loop {
            let (socket, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(_) => break,
            };
            let ctx = Arc::clone(&ctx);
            let registry = Arc::clone(&registry);
            let id = registry.begin();
            tokio::spawn(async move {
                let _ = handle_connection(socket, peer, ctx, Arc::clone(&registry), id).await;
                registry.end(id);
            });
        }
    });

    TestServer {
        addr,
        root,
        _dir: dir,
    }
}

struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, writer) = stream.into_split();
        let mut client = Client {
            reader: BufReader::new(reader),
            writer,
        };
        let greeting = client.read_reply().await;
        assert_eq!(greeting, "220 ready");
        client
    }

    /// Reads reply lines until the final one (three digits, then a space
    /// or end of line).
    async fn read_reply(&mut self) -> String {
        loop {
            let mut line = String::new();
            let n = self.reader.read_line(&mut line).await.unwrap();
            if n == 0 {
                return String::new();
            }
            let line = line.trim_end().to_string();
            let bytes = line.as_bytes();
            let has_code = bytes.len() >= 3 && bytes[..3].iter().all(|b| b.is_ascii_digit());
            if has_code && (bytes.len() == 3 || bytes[3] == b' ') {
                return line;
            }
        }
    }

    async fn cmd(&mut self, command: &str) -> String {
        self.writer
            .write_all(format!("{}\r\n", command).as_bytes())
            .await
            .unwrap();
        self.read_reply().await
    }

    async fn login(&mut self, user: &str, pass: &str) {
        assert_eq!(self.cmd(&format!("USER {}", user)).await, "331 password required");
        assert_eq!(self.cmd(&format!("PASS {}", pass)).await, "230 logged in");
    }

    /// Enters passive mode and opens the data connection.
    async fn pasv_data(&mut self) -> TcpStream {
        let reply = self.cmd("PASV").await;
        assert!(reply.starts_with("227 Entering Passive Mode ("), "{}", reply);
        let inner = &reply[reply.find('(').unwrap() + 1..reply.rfind(')').unwrap()];
        let parts: Vec<u16> = inner.split(',').map(|p| p.parse().unwrap()).collect();
        assert_eq!(parts.len(), 6);
        let port = parts[4] * 256 + parts[5];
        let ip = format!("{}.{}.{}.{}", parts[0], parts[1], parts[2], parts[3]);
        TcpStream::connect((ip.as_str(), port)).await.unwrap()
    }
}

const GROUPS: &str = "users=rwx,01:01,{ROOT}\n";
const ACCOUNTS: &str = "alice=users,secret\nbob=users,\n";

#[tokio::test]
async fn login_and_navigation_scenario() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    let mut client = Client::connect(server.addr).await;

    client.login("alice", "secret").await;
    assert_eq!(
        client.cmd("PWD").await,
        "257 \"/\" is working directory"
    );
    assert_eq!(client.cmd("MKD sub").await, "250 /sub created");
    assert_eq!(
        client.cmd("CWD sub").await,
        "250 \"/sub\" is working directory"
    );
    assert_eq!(
        client.cmd("CDUP").await,
        "250 \"/\" is working directory"
    );
    assert_eq!(client.cmd("CDUP").await, "250 \"/\" is root directory");
    assert!(server.root.join("sub").is_dir());
}

#[tokio::test]
async fn empty_password_logs_in_with_user_alone() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    let mut client = Client::connect(server.addr).await;
    assert_eq!(client.cmd("USER bob").await, "230 logged in");
    assert_eq!(
        client.cmd("PWD").await,
        "257 \"/\" is working directory"
    );
}

#[tokio::test]
async fn wrong_password_keeps_session_unauthenticated() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    let mut client = Client::connect(server.addr).await;

    assert_eq!(client.cmd("USER alice").await, "331 password required");
    assert_eq!(
        client.cmd("PASS nope").await,
        "530 authorization failed. not logged in"
    );
    assert_eq!(client.cmd("PWD").await, "530 not logged in");
    // the failure does not poison a later, correct login
    client.login("alice", "secret").await;
}

#[tokio::test]
async fn unknown_user_cannot_complete_login() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    let mut client = Client::connect(server.addr).await;

    assert_eq!(client.cmd("USER ghost").await, "331 password required");
    assert_eq!(
        client.cmd("PASS anything").await,
        "530 authorization failed. not logged in"
    );
}

#[tokio::test]
async fn transfers_require_a_data_connection() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    let mut client = Client::connect(server.addr).await;
    client.login("alice", "secret").await;

    assert_eq!(client.cmd("RETR x").await, "503 need PORT first");
    assert_eq!(client.cmd("STOR x").await, "503 need PORT first");
    assert_eq!(client.cmd("LIST").await, "503 need PORT first");
    assert!(!server.root.join("x").exists());
}

#[tokio::test]
async fn stor_retr_round_trip() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    let mut client = Client::connect(server.addr).await;
    client.login("alice", "secret").await;

    let payload: Vec<u8> = b"hello ferroftpd \x00\x01\x02\xff payload".to_vec();

    let mut data = client.pasv_data().await;
    assert_eq!(
        client.cmd("STOR up.bin").await,
        "125 opening BINARY data connection"
    );
    data.write_all(&payload).await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);
    assert_eq!(
        client.read_reply().await,
        format!("226 closing data connection for /up.bin, {} bytes", payload.len())
    );

    assert_eq!(
        client.cmd("SIZE up.bin").await,
        format!("213 {}", payload.len())
    );

    let mut data = client.pasv_data().await;
    let reply = client.cmd("RETR up.bin").await;
    assert_eq!(
        reply,
        format!(
            "150 opening BINARY data connection for /up.bin, {} bytes",
            payload.len()
        )
    );
    let mut downloaded = Vec::new();
    data.read_to_end(&mut downloaded).await.unwrap();
    assert_eq!(downloaded, payload);
    assert_eq!(client.read_reply().await, "226 closing data connection");
}

#[tokio::test]
async fn list_omits_invisible_files() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    std::fs::write(server.root.join("a.txt"), b"abc").unwrap();
    std::fs::write(server.root.join(".DS_Store"), b"junk").unwrap();

    let mut client = Client::connect(server.addr).await;
    client.login("alice", "secret").await;

    let mut data = client.pasv_data().await;
    assert_eq!(
        client.cmd("LIST").await,
        "150 opening ASCII data connection"
    );
    let mut listing = String::new();
    data.read_to_string(&mut listing).await.unwrap();
    assert_eq!(client.read_reply().await, "226 closing data connection");
    assert!(listing.contains("a.txt"), "{}", listing);
    assert!(!listing.contains(".DS_Store"), "{}", listing);
}

#[tokio::test]
async fn rename_needs_an_existing_source() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    let mut client = Client::connect(server.addr).await;
    client.login("alice", "secret").await;

    assert_eq!(
        client.cmd("RNFR old.txt").await,
        "550 file \"old.txt\" does not exist"
    );
    assert_eq!(client.cmd("RNTO new.txt").await, "503 need RNFR first");

    std::fs::write(server.root.join("old.txt"), b"data").unwrap();
    assert_eq!(
        client.cmd("RNFR old.txt").await,
        "350 send RNTO to rename \"/old.txt\""
    );
    assert_eq!(
        client.cmd("RNTO new.txt").await,
        "250 \"/old.txt\" renamed to \"/new.txt\""
    );
    assert!(!server.root.join("old.txt").exists());
    assert!(server.root.join("new.txt").exists());
}

#[tokio::test]
async fn traversal_is_rejected_as_server_error() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    let mut client = Client::connect(server.addr).await;
    client.login("alice", "secret").await;

    assert_eq!(client.cmd("CWD ..").await, "550 illegal internal path");
    assert_eq!(
        client.cmd("CWD ../../etc").await,
        "550 illegal internal path"
    );
    assert_eq!(
        client.cmd("DELE ../somewhere").await,
        "550 illegal internal path"
    );
}

#[tokio::test]
async fn pasv_twice_allocates_without_error() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    let mut client = Client::connect(server.addr).await;
    client.login("alice", "secret").await;

    let first = client.cmd("PASV").await;
    assert!(first.starts_with("227 Entering Passive Mode ("));
    let second = client.cmd("PASV").await;
    assert!(second.starts_with("227 Entering Passive Mode ("));
}

#[tokio::test]
async fn epsv_reports_a_bracketed_port() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    let mut client = Client::connect(server.addr).await;
    client.login("alice", "secret").await;

    let reply = client.cmd("EPSV").await;
    assert!(reply.starts_with("229 Entering Extended Passive Mode (|||"), "{}", reply);
    assert!(reply.ends_with("|)"));
}

#[tokio::test]
async fn read_only_group_cannot_mutate() {
    let server = start_test_server(
        "users=rwx,01:01,{ROOT}\nreaders=r--,01:01,{ROOT}\n",
        "alice=users,secret\nrita=readers,secret\n",
    )
    .await;
    std::fs::write(server.root.join("keep.txt"), b"data").unwrap();

    let mut client = Client::connect(server.addr).await;
    client.login("rita", "secret").await;
    assert_eq!(client.cmd("MKD sub").await, "550 no write permission");
    assert_eq!(
        client.cmd("DELE keep.txt").await,
        "550 no permission to delete"
    );
    assert!(server.root.join("keep.txt").exists());
}

#[tokio::test]
async fn quit_says_goodbye_and_hangs_up() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    let mut client = Client::connect(server.addr).await;

    assert_eq!(client.cmd("QUIT").await, "221 goodbye");
    // connection is gone afterwards
    let mut line = String::new();
    let n = client.reader.read_line(&mut line).await.unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn unknown_verb_is_not_implemented() {
    let server = start_test_server(GROUPS, ACCOUNTS).await;
    let mut client = Client::connect(server.addr).await;
    assert_eq!(client.cmd("BOGUS").await, "502 command not implemented");
}

#[test]
fn penalty_policy_escalates_and_disconnects() {
    let mut session = Session::new("127.0.0.1:0".parse().unwrap(), None);

    session.wrong_login();
    assert_eq!(session.login_attempts, 1);
    match session.penalty_login() {
        PenaltyAction::Wait(wait) => assert!(wait.is_zero()),
        PenaltyAction::Disconnect => panic!("first failure must not disconnect"),
    }

    session.wrong_login();
    match session.penalty_login() {
        PenaltyAction::Wait(wait) => {
            assert!(wait.as_millis() >= 2000 && wait.as_millis() <= 2500)
        }
        PenaltyAction::Disconnect => panic!("second failure must not disconnect"),
    }

    for _ in 0..3 {
        session.wrong_login();
    }
    assert_eq!(session.login_attempts, 5);
    assert_eq!(session.penalty_login(), PenaltyAction::Disconnect);
}
