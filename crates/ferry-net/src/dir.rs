//! Static site fetcher
//!
//! Serves a built site directory (`_site/`) as if it were the origin, so a
//! site can be previewed without a web server.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use url::{Origin, Url};

use crate::{Fetcher, NetError, PageRequest};

/// Fetcher backed by a directory of pages
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
    origin: Origin,
}

impl DirectoryFetcher {
    /// Serve `root` as the origin of `site`
    pub fn new(root: impl Into<PathBuf>, site: &Url) -> Self {
        Self {
            root: root.into(),
            origin: site.origin(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files that may hold the page for `url`, most specific first.
    /// `/` and `/x/` map to `index.html`; `/x` tries `x.html` then
    /// `x/index.html`; paths with an extension map to themselves.
    pub fn candidates(&self, url: &Url) -> Vec<PathBuf> {
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segs| segs.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        if segments.iter().any(|s| *s == "..") {
            return Vec::new();
        }

        let mut base = self.root.clone();
        base.extend(&segments);

        let is_dir = url.path().ends_with('/') || segments.is_empty();
        let Some(last) = segments.last() else {
            return vec![base.join("index.html")];
        };

        if is_dir {
            vec![base.join("index.html")]
        } else if Path::new(last).extension().is_some() {
            vec![base]
        } else {
            vec![base.with_extension("html"), base.join("index.html")]
        }
    }
}

impl Fetcher for DirectoryFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<String, NetError> {
        if request.url.origin() != self.origin {
            return Err(NetError::CrossOrigin(request.url.clone()));
        }

        for candidate in self.candidates(&request.url) {
            match smol::fs::read_to_string(&candidate).await {
                Ok(text) => {
                    tracing::info!("Serving {} from {}", request.url, candidate.display());
                    return Ok(text);
                }
                Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(NetError::HttpError { status: 404 })
    }
}
