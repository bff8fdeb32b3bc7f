use super::store::PermissionStore;
use std::io::Write;

fn write_tables(groups: &str, accounts: &str) -> (tempfile::TempDir, PermissionStore) {
    let dir = tempfile::tempdir().unwrap();
    let groups_path = dir.path().join("ftpd.groups");
    let accounts_path = dir.path().join("ftpd.accounts");
    std::fs::File::create(&groups_path)
        .unwrap()
        .write_all(groups.as_bytes())
        .unwrap();
    std::fs::File::create(&accounts_path)
        .unwrap()
        .write_all(accounts.as_bytes())
        .unwrap();
    let store = PermissionStore::new(&groups_path, &accounts_path);
    store.load_permissions().unwrap();
    (dir, store)
}

#[test]
fn account_group_and_password() {
    let (_dir, store) = write_tables(
        "users=rwx,01:01,/home/ftp\n",
        "alice=users,secret\nbob=users,\ncarol=users\n",
    );
    assert_eq!(store.group("alice"), "users");
    assert_eq!(store.password("alice"), Some("secret".to_string()));
    // empty password after the comma: none required
    assert_eq!(store.password("bob"), Some("".to_string()));
    // no comma at all: any password accepted
    assert_eq!(store.password("carol"), Some("*".to_string()));
    // unknown account
    assert_eq!(store.group("ghost"), "guest");
    assert_eq!(store.password("ghost"), None);
}

#[test]
fn permission_triad() {
    let (_dir, store) = write_tables(
        "users=rwx,01:01,/srv\nreaders=r--,01:01,/srv\nshort=r\n",
        "alice=users,x\nrita=readers,x\nstan=short,x\n",
    );
    assert!(store.can_read("alice"));
    assert!(store.can_write("alice"));
    assert!(store.can_exec("alice"));
    assert!(store.can_read("rita"));
    assert!(!store.can_write("rita"));
    assert!(!store.can_exec("rita"));
    // short definitions default to false past their end
    assert!(store.can_read("stan"));
    assert!(!store.can_write("stan"));
    // no group definition at all
    assert!(!store.can_read("ghost"));
}

#[test]
fn root_resolution() {
    let (_dir, store) = write_tables(
        "users=rwx,01:01,/home/ftp/\nmapped=rwx,01:01,{/=/srv/a /sub=/srv/b}\n",
        "alice=users,x\nmike=mapped,x\n",
    );
    assert_eq!(store.root("alice").unwrap().to_str().unwrap(), "/home/ftp");
    assert_eq!(store.root("mike").unwrap().to_str().unwrap(), "/srv/a");
    assert_eq!(
        store.path_for("mike", "/sub").unwrap().to_str().unwrap(),
        "/srv/b"
    );
    // a map without the requested token is a configuration error
    assert!(store.path_for("mike", "/nope").is_none());
    // a plain path only covers the root token
    assert!(store.path_for("alice", "/sub").is_none());
}

#[test]
fn ratio_parsing() {
    let (_dir, store) = write_tables(
        "users=rwx,02:01,/srv\nbroken=rwx,xx:yy,/srv\nzero=rwx,01:00,/srv\n",
        "alice=users,x\nbert=broken,x\nzed=zero,x\n",
    );
    assert!((store.ratio("alice") - 2.0).abs() < f64::EPSILON);
    assert_eq!(store.ratio("bert"), 0.0);
    assert_eq!(store.ratio("zed"), 0.0);
    assert_eq!(store.ratio("ghost"), 0.0);
}

#[test]
fn reload_failure_keeps_old_tables() {
    let dir = tempfile::tempdir().unwrap();
    let groups_path = dir.path().join("ftpd.groups");
    let accounts_path = dir.path().join("ftpd.accounts");
    std::fs::write(&groups_path, "users=rwx,01:01,/srv\n").unwrap();
    std::fs::write(&accounts_path, "alice=users,secret\n").unwrap();
    let store = PermissionStore::new(&groups_path, &accounts_path);
    store.load_permissions().unwrap();
    assert!(store.can_read("alice"));

    // break the accounts file; the reload must fail without clearing anything
    std::fs::remove_file(&accounts_path).unwrap();
    assert!(store.load_permissions().is_err());
    assert!(store.can_read("alice"));
    assert_eq!(store.password("alice"), Some("secret".to_string()));
}
