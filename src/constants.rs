// src/constants.rs

use std::time::Duration;

pub const USERNAME_REGEX: &str = r"^[a-zA-Z0-9]{1,32}$";

/// Buffer size of the data-connection copy loop.
pub const BUFFER_SIZE: usize = 4048;

/// A worker idle longer than this is reclassified as sleeping.
pub const SLEEP_THRESHOLD: Duration = Duration::from_secs(30);

/// A sleeping worker older than this is considered dead-locked.
pub const SLEEP_LIMIT: Duration = Duration::from_secs(3600);

/// How often the watchdog sweeps the session registry.
pub const WATCHDOG_INTERVAL: Duration = Duration::from_secs(15);

/// Accept timeout on a passive-mode listener once a transfer starts.
pub const PASV_ACCEPT_TIMEOUT: Duration = Duration::from_secs(3);

/// Backoff between bind attempts on a fixed, configured data port.
pub const PASV_BIND_BACKOFF: Duration = Duration::from_millis(500);

/// Token of the virtual root in group root-path declarations.
pub const VIRTUAL_ROOT: &str = "/";
