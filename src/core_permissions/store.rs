use crate::constants::VIRTUAL_ROOT;
use crate::core_permissions::error::PermissionError;
use log::{error, info};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Group and account tables.
///
/// Groups are declared as `<name>=rwx,up:do,<root-spec>`: a permission triad,
/// an upload:download ratio, and the root path the group is confined to. The
/// root-spec is either a plain path or a `{token=path ...}` map keyed by the
/// symbolic working-directory token. Accounts are `<name>=<group>,<password>`;
/// without a comma any password is accepted, an empty password after the comma
/// means none is required.
#[derive(Debug, Default)]
struct Tables {
    groups: HashMap<String, String>,
    accounts: HashMap<String, String>,
}

/// Shared, read-mostly permission tables. `load_permissions` replaces both
/// tables as a unit; a failed reload leaves the previous tables visible.
#[derive(Debug)]
pub struct PermissionStore {
    groups_file: PathBuf,
    accounts_file: PathBuf,
    tables: RwLock<Tables>,
}

impl PermissionStore {
    pub fn new(groups_file: impl Into<PathBuf>, accounts_file: impl Into<PathBuf>) -> Self {
        Self {
            groups_file: groups_file.into(),
            accounts_file: accounts_file.into(),
            tables: RwLock::new(Tables::default()),
        }
    }

    /// (Re)parses both tables and swaps them in atomically.
    pub fn load_permissions(&self) -> Result<(), PermissionError> {
        let groups = load_property_file(&self.groups_file)?;
        let accounts = load_property_file(&self.accounts_file)?;
        info!(
            "loaded {} groups and {} accounts",
            groups.len(),
            accounts.len()
        );
        let mut tables = self.tables.write().unwrap();
        *tables = Tables { groups, accounts };
        Ok(())
    }

    /// The user's group; unknown users fall back to the unprivileged "guest".
    pub fn group(&self, user: &str) -> String {
        let tables = self.tables.read().unwrap();
        match tables.accounts.get(user) {
            None => "guest".to_string(),
            Some(def) => match def.find(',') {
                None => def.clone(),
                Some(i) => def[..i].to_string(),
            },
        }
    }

    /// The account's configured password. `None` means no such account;
    /// `"*"` accepts any password; `""` requires none.
    pub fn password(&self, user: &str) -> Option<String> {
        let tables = self.tables.read().unwrap();
        let def = tables.accounts.get(user)?;
        match def.find(',') {
            None => Some("*".to_string()),
            Some(i) => Some(def[i + 1..].to_string()),
        }
    }

    pub fn can_read(&self, user: &str) -> bool {
        self.permission_char(user, 0) == Some('r')
    }

    pub fn can_write(&self, user: &str) -> bool {
        self.permission_char(user, 1) == Some('w')
    }

    pub fn can_exec(&self, user: &str) -> bool {
        self.permission_char(user, 2) == Some('x')
    }

    fn permission_char(&self, user: &str, pos: usize) -> Option<char> {
        let group = self.group(user);
        let tables = self.tables.read().unwrap();
        tables.groups.get(&group)?.chars().nth(pos)
    }

    /// The real filesystem root the user is confined to.
    pub fn root(&self, user: &str) -> Option<PathBuf> {
        self.path_for(user, VIRTUAL_ROOT)
    }

    /// Resolves the group's root-spec for a working-directory token.
    pub fn path_for(&self, user: &str, user_wd: &str) -> Option<PathBuf> {
        let group = self.group(user);
        let def = {
            let tables = self.tables.read().unwrap();
            tables.groups.get(&group)?.clone()
        };
        if def.len() <= 10 {
            return None;
        }
        let spec = &def[10..];
        if let Some(inner) = spec.strip_prefix('{') {
            let inner = match inner.strip_suffix('}') {
                Some(inner) => inner,
                None => {
                    error!(
                        "wrong groups configuration: path declaration for user '{}' does not end with '}}'",
                        user
                    );
                    return None;
                }
            };
            let map = parse_root_map(inner);
            match map.get(user_wd) {
                Some(path) => Some(PathBuf::from(trim_trailing_separator(path))),
                None => {
                    error!(
                        "wrong groups configuration: no path declared for working directory '{}' of user '{}'",
                        user_wd, user
                    );
                    None
                }
            }
        } else {
            // a plain path declaration only covers the root token
            if user_wd != VIRTUAL_ROOT {
                error!(
                    "wrong groups configuration: path declaration for user '{}' contains no symbolic link declaration other than root path",
                    user
                );
                return None;
            }
            Some(PathBuf::from(trim_trailing_separator(spec)))
        }
    }

    /// The group's upload:download ratio; malformed data yields 0.0.
    pub fn ratio(&self, user: &str) -> f64 {
        let group = self.group(user);
        let tables = self.tables.read().unwrap();
        let def = match tables.groups.get(&group) {
            Some(def) => def,
            None => return 0.0,
        };
        let up = match def.get(4..6).and_then(|s| s.parse::<u32>().ok()) {
            Some(n) => n,
            None => return 0.0,
        };
        let down = match def.get(7..9).and_then(|s| s.parse::<u32>().ok()) {
            Some(n) => n,
            None => return 0.0,
        };
        if down == 0 {
            return 0.0;
        }
        f64::from(up) / f64::from(down)
    }

    /// All known account names, for the startup banner.
    pub fn users(&self) -> Vec<String> {
        let tables = self.tables.read().unwrap();
        let mut users: Vec<String> = tables.accounts.keys().cloned().collect();
        users.sort();
        users
    }
}

fn load_property_file(path: &Path) -> Result<HashMap<String, String>, PermissionError> {
    let content = fs::read_to_string(path)
        .map_err(|e| PermissionError::TableReadError(format!("{}: {}", path.display(), e)))?;
    let mut map = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| PermissionError::TableParseError(line.to_string()))?;
        map.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(map)
}

fn parse_root_map(inner: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for pair in inner.split_whitespace() {
        if let Some((key, value)) = pair.split_once('=') {
            map.insert(key.to_string(), value.to_string());
        }
    }
    map
}

fn trim_trailing_separator(path: &str) -> &str {
    if path.len() > 3 && (path.ends_with('/') || path.ends_with('\\')) {
        &path[..path.len() - 1]
    } else {
        path
    }
}
