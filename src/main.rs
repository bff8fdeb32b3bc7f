mod config;
mod constants;
mod core_cli;
mod core_ftpcommand;
mod core_hooks;
mod core_network;
mod core_permissions;
mod core_vfs;
mod helpers;
mod server;
mod session;
mod watchdog;

pub use crate::config::Config;

use crate::core_cli::Cli;
use crate::core_permissions::PermissionStore;
use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info, warn};
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    let default_filter = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_filter))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    // Determine the default config path based on the OS
    let default_config_path = if cfg!(target_os = "windows") {
        "C:\\ferroftpd\\etc\\ferroftpd.conf"
    } else {
        "/etc/ferroftpd.conf"
    };

    let config_path = if args.config.is_empty() {
        default_config_path
    } else {
        args.config.as_str()
    };
    let config = Arc::new(helpers::load_config(config_path)?);

    // Load the permission tables; a failed load leaves them empty and
    // everyone lands in the guest group
    let store = Arc::new(PermissionStore::new(
        &config.server.groups_file,
        &config.server.accounts_file,
    ));
    if let Err(e) = store.load_permissions() {
        error!("could not load permission tables: {}", e);
    }
    print_account_banner(&store);

    // Run the FTP server
    server::run(config, store).await?;

    Ok(())
}

fn print_account_banner(store: &PermissionStore) {
    info!("  ACTIVE ACCOUNT     GROUP-SPECIFIC ROOT PATH             ACCESS RIGHTS");
    info!("  ------------------ ------------------------------------ ---------------");
    for account in store.users() {
        let root = store
            .root(&account)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| String::from("(unresolved)"));
        let rights = format!(
            "{}{}{}",
            if store.can_read(&account) { "READ/" } else { "-/" },
            if store.can_write(&account) { "WRITE/" } else { "-/" },
            if store.can_exec(&account) { "EXEC" } else { "-" }
        );
        info!("  {:<18} {:<36} {}", account, root, rights);
        match store.password(&account).as_deref() {
            Some("") => warn!("account \"{}\" requires no password", account),
            Some("*") => warn!("account \"{}\" accepts any password", account),
            _ => {}
        }
    }
}
