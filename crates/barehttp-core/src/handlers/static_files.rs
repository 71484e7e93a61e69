//! Static file serving handler
//!
//! Serves files beneath one root directory. Every request path is
//! percent-decoded, normalized lexically and then canonicalized; anything
//! that ends up outside the root is refused with 403.

use crate::request::percent_decode_path;
use crate::{Response, ResponseBuilder, StatusCode};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Static file handler
#[derive(Debug, Clone)]
pub struct StaticFiles {
    /// Canonical root directory
    root: PathBuf,
    /// File served for directory requests
    index: String,
}

/// Outcome of mapping a request path onto the root
#[derive(Debug, PartialEq)]
enum Resolved {
    File(PathBuf),
    Forbidden,
    Missing,
}

impl StaticFiles {
    /// Serve files from `root`, creating the directory if it does not exist
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        Ok(Self {
            root: std::fs::canonicalize(root)?,
            index: "index.html".to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Handle a request for `path` (raw, still percent-encoded)
    pub async fn serve(&self, path: &str) -> Response {
        let file = match self.resolve(path).await {
            Resolved::File(file) => file,
            Resolved::Forbidden => {
                tracing::warn!("refused path outside root: {}", path);
                return Response::forbidden("Access denied");
            }
            Resolved::Missing => return Response::not_found("File not found"),
        };

        match tokio::fs::read(&file).await {
            Ok(content) => {
                tracing::debug!("served {}", file.display());
                ResponseBuilder::new(StatusCode::OK)
                    .content_type(mime_type(&file))
                    .body(content)
                    .build()
            }
            Err(_) => Response::not_found("File not found"),
        }
    }

    async fn resolve(&self, path: &str) -> Resolved {
        let Some(relative) = normalize(&percent_decode_path(path)) else {
            return Resolved::Forbidden;
        };

        let candidate = match tokio::fs::canonicalize(self.root.join(&relative)).await {
            Ok(p) => p,
            Err(_) => return Resolved::Missing,
        };
        // Symlinks may still point outside
        if !candidate.starts_with(&self.root) {
            return Resolved::Forbidden;
        }

        match tokio::fs::metadata(&candidate).await {
            Ok(meta) if meta.is_file() => Resolved::File(candidate),
            Ok(meta) if meta.is_dir() => {
                let index = candidate.join(&self.index);
                match tokio::fs::metadata(&index).await {
                    Ok(m) if m.is_file() => Resolved::File(index),
                    _ => Resolved::Missing,
                }
            }
            _ => Resolved::Missing,
        }
    }
}

/// Lexically normalize a decoded request path into a root-relative path.
///
/// Returns `None` when `..` would climb above the root or the path carries
/// its own root or drive prefix.
fn normalize(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim_start_matches(['/', '\\']);
    let mut result = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(c) => result.push(c),
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(result)
}

/// MIME type for a file, by extension
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext.to_lowercase().as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",
        "csv" => "text/csv",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "bmp" => "image/bmp",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "wasm" => "application/wasm",

        _ => "application/octet-stream",
    }
}
