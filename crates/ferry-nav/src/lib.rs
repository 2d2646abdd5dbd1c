//! Ferry Navigation
//!
//! In-page navigation for server-rendered sites: same-origin link clicks
//! and back/forward traversals fetch the destination page, swap the
//! content region in place and keep session history in step, falling back
//! to a full page load whenever that fails.

mod bridge;
mod config;
mod engine;
mod error;
mod extractor;
mod history;
mod interceptor;
mod location;
mod scripts;
mod transition;
mod window;

pub use bridge::{HistoryBridge, HistoryMode};
pub use config::{NavConfig, NavConfigBuilder, DEFAULT_ASSET_EXTENSIONS};
pub use engine::{NavigationEngine, NavigationOutcome};
pub use error::{NavError, ScriptError};
pub use extractor::{ContentExtractor, ExtractedPage, Extraction, ScriptDirective};
pub use history::{HistoryEntry, HistoryState, SessionHistory};
pub use interceptor::{find_anchor, LinkInterceptor, NavigationRequest};
pub use location::Location;
pub use scripts::{ScriptReexecutor, ScriptReport, ScriptRunner};
pub use transition::{TransitionApplier, TransitionOutcome};
pub use window::{PopStateEvent, Window};

pub use ferry_net::{CachePolicy, Fetcher, NetError, PageRequest};
