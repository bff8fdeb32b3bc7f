use crate::core_ftpcommand::list::{build_listing, ls_file_line};
use crate::core_ftpcommand::utils::Resolved;
use crate::core_ftpcommand::CommandContext;
use crate::core_hooks::{NoopMacMetadata, SessionHooks};
use crate::core_permissions::PermissionStore;
use crate::core_vfs::Vfs;
use crate::helpers::{fs_date, len_formatted};
use crate::session::{LoginState, Session};
use crate::Config;
use std::sync::Arc;

const CURR: &str = "%b %d %H:%M";
const PREV: &str = "%b %d  %Y";

fn line_date(path: &std::path::Path) -> String {
    let mtime = std::fs::metadata(path).unwrap().modified().unwrap();
    fs_date(CURR, PREV, mtime)
}

#[test]
fn file_line_format() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.txt");
    std::fs::write(&file, b"hello").unwrap();

    let line = ls_file_line(&file, "a.txt", true, true, "users", false, CURR, PREV, &None);
    let expected = format!(
        "-rw-rw-rw-   1 {0} {0}{1} {2} a.txt\r\n",
        len_formatted("users", 8, false),
        len_formatted(" 5", 11, true),
        line_date(&file)
    );
    assert_eq!(line, expected);
}

#[test]
fn unwritable_file_is_reported_as_root() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("locked.txt");
    std::fs::write(&file, b"x").unwrap();
    let mut perms = std::fs::metadata(&file).unwrap().permissions();
    perms.set_readonly(true);
    std::fs::set_permissions(&file, perms).unwrap();

    // the group may write, the file itself may not: write bit denied,
    // owning group shown as root
    let line = ls_file_line(&file, "locked.txt", true, true, "users", false, CURR, PREV, &None);
    assert!(line.starts_with("-r--r--r--   1 root     root    "));

    let mut perms = std::fs::metadata(&file).unwrap().permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    std::fs::set_permissions(&file, perms).unwrap();
}

#[test]
fn directory_line_and_subdir_counting() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    std::fs::write(sub.join("one.txt"), b"1").unwrap();
    std::fs::write(sub.join("two.txt"), b"2").unwrap();

    let line = ls_file_line(&sub, "sub", true, true, "users", false, CURR, PREV, &None);
    let expected = format!(
        "drwxrwxrwx   1 {0} {0}{1} {2} sub\r\n",
        len_formatted("users", 8, false),
        len_formatted(" 0", 11, true),
        line_date(&sub)
    );
    assert_eq!(line, expected);

    // counting subdirectory entries is opt-in
    let counted = ls_file_line(&sub, "sub", true, true, "users", false, CURR, PREV, &None);
    assert!(counted.contains(" 0 "));
    let counted = ls_file_line(&sub, "sub", true, true, "users", true, CURR, PREV, &None);
    assert!(counted.contains(&len_formatted(" 2", 11, true)));
}

#[test]
fn long_group_name_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("f");
    std::fs::write(&file, b"").unwrap();

    let line = ls_file_line(
        &file,
        "f",
        true,
        true,
        "verylonggroupname",
        false,
        CURR,
        PREV,
        &None,
    );
    assert!(line.contains("verylong verylong"));
}

#[test]
fn listing_omits_invisible_entries() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("home");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(root.join("a.txt"), b"abc").unwrap();
    std::fs::write(root.join(".DS_Store"), b"junk").unwrap();

    let groups_path = dir.path().join("ftpd.groups");
    let accounts_path = dir.path().join("ftpd.accounts");
    std::fs::write(
        &groups_path,
        format!("users=rwx,01:01,{}\n", root.to_str().unwrap()),
    )
    .unwrap();
    std::fs::write(&accounts_path, "alice=users,secret\n").unwrap();

    let config = Arc::new(Config::default());
    let store = Arc::new(PermissionStore::new(&groups_path, &accounts_path));
    store.load_permissions().unwrap();
    let hooks = Arc::new(SessionHooks::new(
        Arc::clone(&config),
        Arc::clone(&store),
        Arc::new(NoopMacMetadata),
    ));
    let ctx = CommandContext {
        config,
        store,
        hooks,
    };

    let mut session = Session::new("127.0.0.1:0".parse().unwrap(), None);
    session.username = Some("alice".to_string());
    session.state = LoginState::LoggedIn;

    let resolved = Resolved {
        vfs: Vfs::new(&root),
        virtual_path: String::from("/"),
        real: root.clone(),
    };
    let listing = build_listing(&ctx, &session, &resolved, "", true);
    assert!(listing.contains("a.txt"));
    assert!(!listing.contains(".DS_Store"));

    let names_only = build_listing(&ctx, &session, &resolved, "", false);
    assert_eq!(names_only, "a.txt\r\n");
}
