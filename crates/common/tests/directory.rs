//! Integration tests for publishing roots and opening by username

mod common;

use ::common::fs::{FileSystem, FsError};
use ::common::store::{Directory, DirectoryError};
use bytes::Bytes;

#[tokio::test]
async fn test_publish_then_for_user() {
    let (mut fs, env, _temp) = common::setup_test_env().await;

    fs.add("public/hello.txt", b"hi").await.unwrap();
    let root = fs.publish("alice").await.unwrap();

    assert_eq!(
        env.ctx.directory.resolve_root_cid("alice").await.unwrap(),
        root
    );

    let opened = FileSystem::for_user(&env.ctx, "alice", &env.config)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        opened.cat("public/hello.txt").await.unwrap(),
        Some(Bytes::from_static(b"hi"))
    );
}

#[tokio::test]
async fn test_for_unknown_user() {
    let (_, env, _temp) = common::setup_test_env().await;

    let result = FileSystem::for_user(&env.ctx, "nobody", &env.config).await;
    assert!(matches!(
        result,
        Err(FsError::Directory(DirectoryError::NoRoot(_)))
    ));
}

#[tokio::test]
async fn test_publish_rejects_bad_username() {
    let (mut fs, _, _temp) = common::setup_test_env().await;

    let result = fs.publish("-bad-").await;
    assert!(matches!(
        result,
        Err(FsError::Directory(DirectoryError::InvalidUsername(_)))
    ));
}

#[tokio::test]
async fn test_upgrade_public_cid() {
    let (mut fs, env, _temp) = common::setup_test_env().await;

    fs.add("public/keep.txt", b"keep").await.unwrap();
    fs.add("private/drop.txt", b"drop").await.unwrap();
    let public = fs.public().cid().unwrap();

    let mut upgraded = FileSystem::upgrade_public_cid(&env.ctx, &public, &env.config)
        .await
        .unwrap();

    assert_eq!(
        upgraded.cat("public/keep.txt").await.unwrap(),
        Some(Bytes::from_static(b"keep"))
    );
    assert!(upgraded.ls("private").await.unwrap().is_empty());

    let root = upgraded.sync().await.unwrap();
    assert_ne!(Some(root), fs.root_cid());
    assert_eq!(upgraded.public().cid(), Some(public));
}
