use crate::core_network::network;
use crate::core_permissions::PermissionStore;
use crate::Config;
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

/// Runs the FTP server with the provided configuration and permission
/// tables. Only a failing bootstrap returns; the accept loop is endless.
pub async fn run(config: Arc<Config>, store: Arc<PermissionStore>) -> Result<()> {
    info!("starting server on port {}", config.server.listen_port);

    match network::start_server(config, store).await {
        Ok(_) => info!("server terminated"),
        Err(e) => {
            error!("failed to start server: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
