//! Integration tests for FileSystem pin_list

mod common;

use std::collections::HashSet;

use ::common::store::ObjectStore;

#[tokio::test]
async fn test_pin_list_of_empty_fs() {
    let (mut fs, _, _temp) = common::setup_test_env().await;

    let pins = fs.pin_list().await.unwrap();
    // private root, its version blob, and the file system root
    assert_eq!(pins.len(), 3);
    assert_eq!(pins.last().copied(), fs.root_cid());
}

#[tokio::test]
async fn test_pin_list_covers_private_tree() {
    let (mut fs, env, _temp) = common::setup_test_env().await;

    fs.add("private/a/one.txt", b"1").await.unwrap();
    fs.add("private/a/b/two.txt", b"2").await.unwrap();
    fs.add("public/ignored.txt", b"p").await.unwrap();

    let pins = fs.pin_list().await.unwrap();
    let unique: HashSet<_> = pins.iter().collect();
    assert_eq!(unique.len(), pins.len());

    // every pin is in the store
    for cid in &pins {
        assert!(env.store.has(cid).await.unwrap(), "missing block {}", cid);
    }

    // private: root, a, b, two files, one shared version blob; plus the fs root
    assert_eq!(pins.len(), 7);

    let public_file = fs.ls("public").await.unwrap()["ignored.txt"].cid;
    assert!(!pins.contains(&public_file));
}

#[tokio::test]
async fn test_pin_list_syncs_first() {
    let (mut fs, _, _temp) = common::setup_test_env().await;

    let before = fs.sync().await.unwrap();
    fs.add("private/new.txt", b"n").await.unwrap();
    let pins = fs.pin_list().await.unwrap();

    let root = fs.root_cid().unwrap();
    assert_ne!(root, before);
    assert_eq!(pins.last(), Some(&root));
}
