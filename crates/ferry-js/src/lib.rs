//! Ferry JavaScript Runtime
//!
//! QuickJS-based runtime that executes the scripts carried by swapped-in
//! page content. One runtime lives for the whole page session, so globals
//! set by one page's scripts stay visible to the next.

mod console;
mod runtime;

pub use runtime::ScriptRuntime;

/// JavaScript error
#[derive(Debug, thiserror::Error)]
pub enum JsError {
    #[error("JavaScript error in {origin}: {message}")]
    Runtime { origin: String, message: String },

    #[error("Failed to start QuickJS: {0}")]
    Init(String),
}
