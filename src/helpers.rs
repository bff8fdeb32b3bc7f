use crate::Config;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Local};
use std::fs;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

pub fn load_config(path: &str) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path))?;
    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse configuration file: {}", path))?;
    Ok(config)
}

/// Sends one reply line, CRLF-terminated.
pub async fn write_line(
    writer: &Arc<Mutex<TcpStream>>,
    line: &str,
) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\r\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Applies the negotiated character coding to an incoming argument.
/// With a coding active, literal "%20" sequences stand for spaces.
pub fn decode_char(charcoding: &Option<String>, s: &str) -> String {
    match charcoding {
        Some(_) => s.replace("%20", " "),
        None => s.to_string(),
    }
}

/// Applies the negotiated character coding to an outgoing file name.
pub fn encode_char(charcoding: &Option<String>, s: &str) -> String {
    match charcoding {
        Some(_) => s.replace("%20", " "),
        None => s.to_string(),
    }
}

/// Splits a command argument into whitespace-separated words.
pub fn split_args(arg: &str) -> Vec<String> {
    arg.split_whitespace().map(|s| s.to_string()).collect()
}

/// First word of an argument list.
pub fn car(arg: &str) -> Option<&str> {
    if arg.is_empty() {
        return None;
    }
    match arg.find(' ') {
        Some(pos) => Some(&arg[..pos]),
        None => Some(arg),
    }
}

/// Everything after the first word.
pub fn cdr(arg: &str) -> Option<&str> {
    match arg.find(' ') {
        Some(pos) => Some(&arg[pos + 1..]),
        None => None,
    }
}

/// Pads `s` to `width`; `right` selects right-justification.
pub fn len_formatted(s: &str, width: usize, right: bool) -> String {
    if right {
        format!("{:>width$}", s, width = width)
    } else {
        format!("{:<width$}", s, width = width)
    }
}

/// Formats a modification time for a directory listing. Entries of the
/// current year show the time of day, older ones show the year.
pub fn fs_date(curr_year_format: &str, prev_year_format: &str, mtime: SystemTime) -> String {
    let dt: DateTime<Local> = mtime.into();
    if dt.year() == Local::now().year() {
        dt.format(curr_year_format).to_string()
    } else {
        dt.format(prev_year_format).to_string()
    }
}
