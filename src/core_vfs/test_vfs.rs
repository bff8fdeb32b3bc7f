use super::error::VfsError;
use super::vfs::{invisible_file, join_virtual, normalize_virtual, parent_virtual, Vfs};
use std::path::Path;

#[test]
fn resolve_root_yields_group_root() {
    let vfs = Vfs::new("/home/alice");
    assert_eq!(vfs.resolve("/").unwrap(), Path::new("/home/alice"));
}

#[test]
fn resolve_stays_below_root() {
    let vfs = Vfs::new("/home/alice");
    assert_eq!(
        vfs.resolve("/sub/file.txt").unwrap(),
        Path::new("/home/alice/sub/file.txt")
    );
    assert_eq!(
        vfs.resolve("/sub/../other").unwrap(),
        Path::new("/home/alice/other")
    );
}

#[test]
fn traversal_above_root_is_an_escape() {
    let vfs = Vfs::new("/home/alice");
    assert_eq!(vfs.resolve("/.."), Err(VfsError::Escape));
    assert_eq!(vfs.resolve("/sub/../../etc/passwd"), Err(VfsError::Escape));
    assert_eq!(vfs.resolve("/../../.."), Err(VfsError::Escape));
}

#[test]
fn virtual_of_round_trip() {
    let vfs = Vfs::new("/home/alice");
    let real = vfs.resolve("/sub/file.txt").unwrap();
    assert_eq!(vfs.virtual_of(&real).unwrap(), "/sub/file.txt");
    assert_eq!(vfs.virtual_of(Path::new("/home/alice")).unwrap(), "/");
    assert_eq!(
        vfs.virtual_of(Path::new("/etc/passwd")),
        Err(VfsError::Escape)
    );
}

#[test]
fn join_and_parent() {
    assert_eq!(join_virtual("/", "sub"), "/sub");
    assert_eq!(join_virtual("/sub", "file.txt"), "/sub/file.txt");
    assert_eq!(join_virtual("/sub", "/other"), "/other");
    assert_eq!(parent_virtual("/sub/deep"), "/sub");
    assert_eq!(parent_virtual("/sub"), "/");
    assert_eq!(parent_virtual("/"), "/");
}

#[test]
fn normalize_collapses_dots() {
    assert_eq!(normalize_virtual("/a/./b//c").unwrap(), "/a/b/c");
    assert_eq!(normalize_virtual("/a/..").unwrap(), "/");
    assert!(matches!(
        normalize_virtual("relative"),
        Err(VfsError::NotAbsolute(_))
    ));
}

#[test]
fn invisible_predicate() {
    assert!(invisible_file(".DS_Store"));
    assert!(invisible_file("Icon\r"));
    assert!(!invisible_file("Iconic"));
    assert!(!invisible_file("a.txt"));
}
