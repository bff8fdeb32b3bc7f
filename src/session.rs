use rand::Rng;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

/// Login progress of a control connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoginState {
    Unauthenticated = 0,
    UserGiven = 1,
    LoggedIn = 2,
    DataReady = 3,
}

/// Verdict of the login penalty policy after a failed password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyAction {
    Disconnect,
    Wait(Duration),
}

/// State of one control connection, created on accept and dropped on
/// socket close.
#[derive(Debug)]
pub struct Session {
    pub peer_addr: SocketAddr,
    pub state: LoginState,
    pub username: Option<String>,
    /// Virtual working directory, always absolute.
    pub current_dir: String,
    /// Virtual path recorded by RNFR, consumed by RNTO.
    pub rename_from: Option<String>,
    /// Transfer initiated by PASV, otherwise with PORT.
    pub passive: bool,
    /// Peer for active-mode data connections, from PORT/EPRT.
    pub data_peer: Option<SocketAddr>,
    /// Bound listener for passive-mode data connections.
    pub pasv_listener: Option<TcpListener>,
    /// Property set for the OPTS command.
    pub opts: HashMap<String, Option<String>>,
    pub charcoding: Option<String>,
    pub login_attempts: u32,
}

impl Session {
    pub fn new(peer_addr: SocketAddr, charcoding: Option<String>) -> Self {
        Self {
            peer_addr,
            state: LoginState::Unauthenticated,
            username: None,
            current_dir: String::from("/"),
            rename_from: None,
            passive: false,
            data_peer: None,
            pasv_listener: None,
            opts: HashMap::new(),
            charcoding,
            login_attempts: 0,
        }
    }

    /// REIN: back to square one. The announced user survives, the
    /// session-scoped negotiations do not.
    pub fn reinitialize(&mut self, charcoding: Option<String>) {
        self.state = LoginState::Unauthenticated;
        self.current_dir = String::from("/");
        self.rename_from = None;
        self.opts.clear();
        self.charcoding = charcoding;
    }

    pub fn wrong_login(&mut self) {
        self.login_attempts += 1;
    }

    /// Queries the penalty policy for the current attempt count. The
    /// policy decides between a delayed failure reply and a forced
    /// disconnect; the engine only executes the verdict.
    pub fn penalty_login(&self) -> PenaltyAction {
        if self.login_attempts >= 5 {
            return PenaltyAction::Disconnect;
        }
        let base_millis = 2000 * u64::from(self.login_attempts.saturating_sub(1));
        let jitter = rand::thread_rng().gen_range(0..=base_millis / 4);
        PenaltyAction::Wait(Duration::from_millis(base_millis + jitter))
    }
}
