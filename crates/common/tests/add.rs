//! Integration tests for FileSystem add and cat

mod common;

use ::common::fs::FsError;
use bytes::Bytes;

#[tokio::test]
async fn test_add_and_cat_public() {
    let (mut fs, _, _temp) = common::setup_test_env().await;

    fs.add("public/docs/readme.txt", b"hello").await.unwrap();

    let content = fs.cat("public/docs/readme.txt").await.unwrap();
    assert_eq!(content, Some(Bytes::from_static(b"hello")));
}

#[tokio::test]
async fn test_add_and_cat_private() {
    let (mut fs, _, _temp) = common::setup_test_env().await;

    fs.add("private/notes/todo.txt", b"buy milk").await.unwrap();

    let content = fs.cat("private/notes/todo.txt").await.unwrap();
    assert_eq!(content, Some(Bytes::from_static(b"buy milk")));
}

#[tokio::test]
async fn test_add_round_trips_arbitrary_bytes() {
    let (mut fs, _, _temp) = common::setup_test_env().await;

    let binary: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    for (path, content) in [
        ("public/empty", Vec::new()),
        ("private/empty", Vec::new()),
        ("public/bin/blob", binary.clone()),
        ("private/bin/blob", binary.clone()),
    ] {
        fs.add(path, &content).await.unwrap();
        assert_eq!(
            fs.cat(path).await.unwrap().as_deref(),
            Some(content.as_slice())
        );
    }
}

#[tokio::test]
async fn test_add_overwrites() {
    let (mut fs, _, _temp) = common::setup_test_env().await;

    let first = fs.add("public/a.txt", b"one").await.unwrap();
    let second = fs.add("public/a.txt", b"two").await.unwrap();
    assert_ne!(first, second);

    let content = fs.cat("public/a.txt").await.unwrap();
    assert_eq!(content, Some(Bytes::from_static(b"two")));

    let items = fs.ls("public").await.unwrap();
    assert_eq!(items["a.txt"].size, Some(3));
}

#[tokio::test]
async fn test_cat_missing_is_none() {
    let (mut fs, _, _temp) = common::setup_test_env().await;

    fs.mkdir("public/docs").await.unwrap();
    assert_eq!(fs.cat("public/docs/nope.txt").await.unwrap(), None);
    assert_eq!(fs.cat("private/nope.txt").await.unwrap(), None);
}

#[tokio::test]
async fn test_cat_errors() {
    let (mut fs, _, _temp) = common::setup_test_env().await;

    fs.add("public/docs/a.txt", b"a").await.unwrap();

    assert!(matches!(
        fs.cat("public/docs").await,
        Err(FsError::NotAFile(_))
    ));
    assert!(matches!(fs.cat("public").await, Err(FsError::NotAFile(_))));
    assert!(matches!(
        fs.cat("public/missing/a.txt").await,
        Err(FsError::NotFound(_))
    ));
    assert!(matches!(
        fs.cat("public/docs/a.txt/b").await,
        Err(FsError::NotADirectory(_))
    ));
}

#[tokio::test]
async fn test_add_to_namespace_root_is_invalid() {
    let (mut fs, _, _temp) = common::setup_test_env().await;

    assert!(matches!(
        fs.add("private", b"x").await,
        Err(FsError::InvalidPath(_))
    ));
    assert!(matches!(
        fs.add("somewhere/a.txt", b"x").await,
        Err(FsError::InvalidPath(_))
    ));
}
