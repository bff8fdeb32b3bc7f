use crate::core_hooks::macmeta::MacMetadata;
use crate::core_permissions::PermissionStore;
use crate::core_vfs::invisible_file;
use crate::Config;
use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::process::Command;

/// Pre/post event callbacks around mutating filesystem operations.
///
/// Pre hooks answer the permission question for an operation; post hooks
/// perform logging and best-effort side effects. Permission bits are read
/// from the store on every check, never cached.
pub struct SessionHooks {
    config: Arc<Config>,
    store: Arc<PermissionStore>,
    macmeta: Arc<dyn MacMetadata>,
}

impl SessionHooks {
    pub fn new(
        config: Arc<Config>,
        store: Arc<PermissionStore>,
        macmeta: Arc<dyn MacMetadata>,
    ) -> Self {
        Self {
            config,
            store,
            macmeta,
        }
    }

    // CREATION OF FOLDERS

    pub fn make_folder_pre(&self, user: &str) -> bool {
        self.store.can_write(user)
    }

    pub async fn make_folder_post(&self, path: &Path) {
        if self.config.server.listen_port < 1000 {
            self.change_access(path).await;
        }
    }

    // DELETION OF FILES

    pub fn delete_file_pre(&self, user: &str) -> bool {
        self.store.can_write(user)
    }

    pub fn delete_file_post(&self, _path: &Path) {}

    // DELETION OF FOLDERS

    /// Grants the delete and purges housekeeping files the client cannot
    /// see; they would block the delete of an apparently empty directory.
    pub fn delete_folder_pre(&self, user: &str, path: &Path) -> bool {
        if !self.store.can_write(user) {
            return false;
        }
        if let Ok(entries) = std::fs::read_dir(path) {
            for entry in entries.flatten() {
                let name = entry.file_name();
                if invisible_file(&name.to_string_lossy()) {
                    if let Err(e) = std::fs::remove_file(entry.path()) {
                        warn!("could not purge invisible file {:?}: {}", entry.path(), e);
                    }
                }
            }
        }
        true
    }

    pub fn delete_folder_post(&self, _path: &Path) {}

    // DOWNLOAD OF FILES

    pub fn download_pre(&self, user: &str) -> Option<Instant> {
        if self.store.can_read(user) {
            Some(Instant::now())
        } else {
            None
        }
    }

    pub fn download_post(&self, path: &Path, filelength: u64, started: Instant) {
        info!(
            "DOWNLOAD \"{}\", {} kbytes in {:.1} seconds{}",
            path.display(),
            filelength / 1024,
            started.elapsed().as_secs_f64(),
            speed_suffix(filelength, started)
        );
        if let Err(e) = self.macmeta.acquire(path) {
            // metadata is an add-on, stay silent towards the client
            warn!("mac metadata acquire failed for {:?}: {}", path, e);
        }
    }

    // UPLOAD OF FILES

    pub fn upload_pre(&self, user: &str) -> Option<Instant> {
        if self.store.can_write(user) {
            Some(Instant::now())
        } else {
            None
        }
    }

    pub async fn upload_post(&self, path: &Path, filelength: u64, started: Instant) {
        info!(
            "UPLOAD \"{}\", {} kbytes in {:.1} seconds{}",
            path.display(),
            filelength / 1024,
            started.elapsed().as_secs_f64(),
            speed_suffix(filelength, started)
        );
        if self.config.server.listen_port < 1000 {
            self.change_access(path).await;
        }
        if let Err(e) = self.macmeta.apply(path) {
            warn!("mac metadata apply failed for {:?}: {}", path, e);
        }
    }

    // RENAMING OF FILES

    pub fn rename_pre(&self, user: &str) -> bool {
        self.store.can_write(user)
    }

    pub fn rename_post(&self, _path: &Path) {}

    /// Applies the configured mode and ownership to a fresh file or
    /// folder. Runs system tools and swallows every failure; servers
    /// without the tools or the rights simply keep the default bits.
    async fn change_access(&self, path: &Path) {
        let mask = if path.is_dir() {
            &self.config.server.unix_folder_mask
        } else {
            &self.config.server.unix_file_mask
        };
        let target = path.to_string_lossy().to_string();
        self.exec_quiet("chmod", &[mask.as_str(), target.as_str()])
            .await;
        self.exec_quiet(
            "chown",
            &["-f", self.config.server.unix_user.as_str(), target.as_str()],
        )
        .await;
        let group = format!(":{}", self.config.server.unix_group);
        self.exec_quiet("chown", &["-f", group.as_str(), target.as_str()])
            .await;
    }

    /// Runs a system command and waits for it; failures are logged only.
    pub async fn exec_quiet(&self, program: &str, args: &[&str]) {
        match Command::new(program).args(args).status().await {
            Ok(status) => info!("EXEC: {} {:?} = {}", program, args, status),
            Err(e) => error!("IRREGULARITY: exec not possible on this machine: {}", e),
        }
    }
}

fn speed_suffix(filelength: u64, started: Instant) -> String {
    let millis = started.elapsed().as_millis() as u64;
    if millis == 0 {
        String::new()
    } else {
        format!(" ({} kbytes/second)", filelength * 1000 / 1024 / millis)
    }
}
