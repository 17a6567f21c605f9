use super::FsError;

pub const PUBLIC: &str = "public";
pub const PRIVATE: &str = "private";

/// Which of the two trees a path addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Public,
    Private,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Public => PUBLIC,
            Namespace::Private => PRIVATE,
        }
    }
}

/// Split a `/`-delimited path, dropping empty segments
pub fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|part| !part.is_empty()).collect()
}

pub fn join(parts: &[&str]) -> String {
    parts.join("/")
}

/// Split a full path into its namespace and the path within that tree
pub fn route(path: &str) -> Result<(Namespace, String), FsError> {
    let parts = split(path);
    let namespace = match parts.first() {
        Some(&PUBLIC) => Namespace::Public,
        Some(&PRIVATE) => Namespace::Private,
        _ => return Err(FsError::InvalidPath(path.to_string())),
    };
    Ok((namespace, join(&parts[1..])))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_split_drops_empty_segments() {
        assert_eq!(split("/a//b/c/"), vec!["a", "b", "c"]);
        assert!(split("").is_empty());
        assert!(split("///").is_empty());
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&["a", "b"]), "a/b");
        assert_eq!(join(&[]), "");
    }

    #[test]
    fn test_route() {
        assert_eq!(
            route("public/docs/readme.txt").unwrap(),
            (Namespace::Public, "docs/readme.txt".to_string())
        );
        assert_eq!(
            route("/private//secret.txt").unwrap(),
            (Namespace::Private, "secret.txt".to_string())
        );
        assert_eq!(route("public").unwrap(), (Namespace::Public, String::new()));
    }

    #[test]
    fn test_route_rejects_other_namespaces() {
        for path in ["", "/", "pub/a", "docs/public", "Public/a", "privates"] {
            assert!(
                matches!(route(path), Err(FsError::InvalidPath(_))),
                "{path:?} should be rejected"
            );
        }
    }
}
