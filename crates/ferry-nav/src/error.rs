//! Navigation errors

use ferry_dom::SelectorError;
use ferry_net::NetError;

/// Navigation engine error
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// The fetch did not complete or returned a non-success status
    #[error("network error: {0}")]
    Network(#[from] NetError),

    /// The fetched page has no content region
    #[error("response has no element matching `{selector}`")]
    MalformedResponse { selector: String },

    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),

    /// The shell document has no content region to manage
    #[error("document has no content region matching `{0}`")]
    NoContentRegion(String),

    #[error("navigation engine already installed on this window")]
    AlreadyInstalled,

    #[error("history state: {0}")]
    HistoryState(#[from] serde_json::Error),
}

impl NavError {
    /// Whether this failure is answered with a full page load
    pub fn falls_back(&self) -> bool {
        matches!(self, Self::Network(_) | Self::MalformedResponse { .. })
    }
}

/// Failure of a single re-executed script
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to load script {src}: {source}")]
    Load { src: String, source: NetError },

    #[error("invalid script URL {src}: {source}")]
    BadUrl { src: String, source: url::ParseError },

    #[error("script failed: {0}")]
    Execution(String),
}

impl From<ferry_js::JsError> for ScriptError {
    fn from(e: ferry_js::JsError) -> Self {
        Self::Execution(e.to_string())
    }
}
