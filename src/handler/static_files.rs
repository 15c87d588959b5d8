//! Static file serving module
//!
//! Maps request paths onto files beneath the root directory and loads them.

use crate::config::AppState;
use crate::error::ServeError;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Bytes escaped when a path segment is written back into a `Location`
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Outcome of mapping a request path onto the root directory
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// Canonical path of a regular file beneath the root
    File(PathBuf),
    /// Directory requested without trailing slash; value is the Location
    Redirect(String),
}

/// Serve a GET/HEAD request for `path`
pub async fn serve(
    state: &AppState,
    path: &str,
    query: Option<&str>,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, ServeError> {
    match resolve(state, path, query).await? {
        Resolved::Redirect(location) => Ok(http::build_redirect_response(&location)),
        Resolved::File(file) => {
            let content = fs::read(&file).await.map_err(ServeError::from)?;
            let content_type = state.mime.resolve(&file);
            Ok(http::build_file_response(
                Bytes::from(content),
                &content_type,
                is_head,
            ))
        }
    }
}

/// Resolve a request path to a file, a redirect, or an error
///
/// Directories are served through the first existing index file; without
/// one the request is `Forbidden`. Anything that is neither a regular file
/// nor a directory (FIFO, socket, device) is `NotFound`.
pub async fn resolve(
    state: &AppState,
    path: &str,
    query: Option<&str>,
) -> Result<Resolved, ServeError> {
    let segments = normalize_segments(path)?;
    let relative: PathBuf = segments.iter().collect();
    let candidate = confine(&state.root, &state.root.join(&relative), path).await?;

    let metadata = fs::metadata(&candidate).await?;
    if metadata.is_file() {
        return Ok(Resolved::File(candidate));
    }
    if !metadata.is_dir() {
        logger::log_debug(&format!("Not a regular file: {}", candidate.display()));
        return Err(ServeError::NotFound);
    }

    if !path.ends_with('/') {
        return Ok(Resolved::Redirect(directory_location(&segments, query)));
    }

    for index_file in &state.config.index_files {
        let index_path = candidate.join(index_file);
        match fs::metadata(&index_path).await {
            Ok(m) if m.is_file() => {
                let index_path = confine(&state.root, &index_path, path).await?;
                return Ok(Resolved::File(index_path));
            }
            _ => {}
        }
    }

    logger::log_debug(&format!("No index file in directory: {}", candidate.display()));
    Err(ServeError::Forbidden)
}

/// Percent-decode the URI path and normalize it into root-relative segments
///
/// Empty and `.` segments are dropped and `..` removes the previous segment.
/// A `..` that would leave the root, or a segment carrying a backslash or
/// NUL byte, is reported as `NotFound`.
pub fn normalize_segments(path: &str) -> Result<Vec<String>, ServeError> {
    let decoded = percent_decode_str(path).decode_utf8_lossy();

    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ServeError::NotFound);
                }
            }
            s if s.contains('\\') || s.contains('\0') => return Err(ServeError::NotFound),
            s => segments.push(s.to_string()),
        }
    }

    Ok(segments)
}

/// Slash-terminated, root-relative URL of a directory
///
/// Built from the normalized segments, so the result always starts with a
/// single `/` and never names another host.
fn directory_location(segments: &[String], query: Option<&str>) -> String {
    let mut location = String::from("/");
    for segment in segments {
        location.extend(utf8_percent_encode(segment, SEGMENT));
        location.push('/');
    }
    if let Some(q) = query {
        location.push('?');
        location.push_str(q);
    }
    location
}

/// Canonicalize `candidate` and require it to stay beneath `root`
async fn confine(root: &Path, candidate: &Path, request_path: &str) -> Result<PathBuf, ServeError> {
    let canonical = fs::canonicalize(candidate).await?;
    if canonical.starts_with(root) {
        Ok(canonical)
    } else {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            request_path,
            canonical.display()
        ));
        Err(ServeError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    fn state_for(root: &Path) -> AppState {
        AppState::new(ServerConfig::new(root, 0)).unwrap()
    }

    #[test]
    fn test_normalize_segments() {
        assert!(normalize_segments("/").unwrap().is_empty());
        assert_eq!(normalize_segments("/pkg/./detector.wasm").unwrap(), ["pkg", "detector.wasm"]);
        assert_eq!(normalize_segments("/a/b/../c").unwrap(), ["a", "c"]);
        assert_eq!(normalize_segments("//host.example/a").unwrap(), ["host.example", "a"]);
        assert_eq!(normalize_segments("/my%20file.txt").unwrap(), ["my file.txt"]);
    }

    #[test]
    fn test_normalize_rejects_escape() {
        for path in [
            "/../../etc/passwd",
            "/a/../../b",
            "/%2e%2e/etc/passwd",
            "/..%2f..%2fetc",
            "/a%5c..%5cb",
            "/a%00b",
        ] {
            assert!(matches!(normalize_segments(path), Err(ServeError::NotFound)), "{path}");
        }
    }

    #[tokio::test]
    async fn test_resolve_file_and_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.htm"), "docs").unwrap();
        let state = state_for(dir.path());

        assert_eq!(
            resolve(&state, "/", None).await.unwrap(),
            Resolved::File(state.root.join("index.html"))
        );
        assert_eq!(
            resolve(&state, "/docs/", None).await.unwrap(),
            Resolved::File(state.root.join("docs").join("index.htm"))
        );
    }

    #[tokio::test]
    async fn test_resolve_directory_redirect_keeps_query() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let state = state_for(dir.path());

        assert_eq!(
            resolve(&state, "/docs", Some("lang=en")).await.unwrap(),
            Resolved::Redirect("/docs/?lang=en".to_string())
        );
    }

    #[tokio::test]
    async fn test_redirect_location_stays_on_host() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("my docs")).unwrap();
        let state = state_for(dir.path());

        for (path, expected) in [
            ("//evil.example/..", "/"),
            ("//evil.example/%2e%2e", "/"),
            ("///my docs", "/my%20docs/"),
            ("/./my%20docs", "/my%20docs/"),
        ] {
            let Resolved::Redirect(location) = resolve(&state, path, None).await.unwrap() else {
                panic!("{path} should redirect");
            };
            assert_eq!(location, expected, "{path}");
            assert!(!location.starts_with("//"), "{path}");
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_regular_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let _socket = std::os::unix::net::UnixListener::bind(dir.path().join("agent.sock")).unwrap();
        let state = state_for(dir.path());

        assert!(matches!(
            resolve(&state, "/agent.sock", None).await,
            Err(ServeError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_resolve_directory_without_index_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/app.js"), "x").unwrap();
        let state = state_for(dir.path());

        assert!(matches!(
            resolve(&state, "/assets/", None).await,
            Err(ServeError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_resolve_missing() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());
        assert!(matches!(
            resolve(&state, "/missing.txt", None).await,
            Err(ServeError::NotFound)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_blocked() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("www");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        std::os::unix::fs::symlink(outer.path().join("secret.txt"), root.join("leak.txt"))
            .unwrap();
        let state = state_for(&root);

        assert!(matches!(
            resolve(&state, "/leak.txt", None).await,
            Err(ServeError::NotFound)
        ));
    }
}
