use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_port: u16,
    /// Client IP allowlist. "*" admits everyone; anything longer is a
    /// substring-matched list of addresses.
    pub clients: String,
    /// Welcome banner sent in the 220 greeting.
    pub welcome: String,
    /// Character coding applied to file names on the wire ("NONE" disables).
    pub charcoding: Option<String>,
    /// Fixed data port for passive mode; 0 lets the OS choose.
    pub data_port: u16,
    /// Address reported in PASV/EPSV replies instead of the control socket's
    /// local address.
    pub pasv_address: Option<String>,
    /// chrono patterns for listing dates, split on the current year.
    pub curr_year_format: String,
    pub prev_year_format: String,
    /// Count entries of subdirectories in listings (costly, off by default).
    pub count_subdir: bool,
    /// Serve a generated index.html when a missing one is retrieved.
    pub create_index: bool,
    /// Modes and ownership applied to fresh files when running privileged.
    pub unix_file_mask: String,
    pub unix_folder_mask: String,
    pub unix_user: String,
    pub unix_group: String,
    /// Maximum concurrent sessions; 0 = unlimited.
    pub max_sessions: usize,
    /// Read timeouts in seconds; 0 = unlimited.
    pub control_timeout_secs: u64,
    pub data_timeout_secs: u64,
    /// Forcibly abort workers that exceeded the dead-lock limit.
    pub term_sleeping_sessions: bool,
    /// Permission table locations.
    pub groups_file: String,
    pub accounts_file: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: 2121,
            clients: String::from("*"),
            welcome: String::from("Welcome to the ferroftpd FTP server!"),
            charcoding: None,
            data_port: 0,
            pasv_address: None,
            curr_year_format: String::from("%b %d %H:%M"),
            prev_year_format: String::from("%b %d  %Y"),
            count_subdir: false,
            create_index: false,
            unix_file_mask: String::from("666"),
            unix_folder_mask: String::from("777"),
            unix_user: String::from("root"),
            unix_group: String::from("root"),
            max_sessions: 1000,
            control_timeout_secs: 0,
            data_timeout_secs: 0,
            term_sleeping_sessions: false,
            groups_file: String::from("ftpd.groups"),
            accounts_file: String::from("ftpd.accounts"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
        }
    }
}

impl ServerConfig {
    /// The charcoding actually in effect; "NONE" counts as disabled.
    pub fn effective_charcoding(&self) -> Option<String> {
        match &self.charcoding {
            Some(c) if c != "NONE" => Some(c.clone()),
            _ => None,
        }
    }
}
