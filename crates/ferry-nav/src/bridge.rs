//! History bridge
//!
//! Writes engine-owned entries into the window's session history once a
//! swap has been applied.

use url::Url;

use crate::error::NavError;
use crate::history::HistoryState;
use crate::window::Window;

/// How a committed navigation lands in history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMode {
    /// New entry (link clicks)
    #[default]
    Push,
    /// Rewrite the current entry (replayed back/forward traversals)
    Replace,
}

/// Commits navigations to session history
#[derive(Debug, Default, Clone, Copy)]
pub struct HistoryBridge;

impl HistoryBridge {
    /// Record `url` with the engine-owned marker, then point the location at it
    pub fn commit(
        window: &mut Window,
        url: &Url,
        title: Option<&str>,
        mode: HistoryMode,
    ) -> Result<(), NavError> {
        let state = serde_json::to_string(&HistoryState::ENGINE)?;
        let title = title.unwrap_or_default().to_string();

        match mode {
            HistoryMode::Push => window.history_mut().push_state(Some(state), title, url.clone()),
            HistoryMode::Replace => {
                window.history_mut().replace_state(Some(state), title, url.clone())
            }
        }
        window.location_mut().set_url(url.clone());

        tracing::debug!(
            "History {:?} {} (length {})",
            mode,
            url,
            window.history().length()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Window {
        let url = Url::parse("https://labs.example/").unwrap();
        Window::from_html(&url, "<title>Home</title><div id=\"content\"></div>")
    }

    #[test]
    fn test_push_adds_owned_entry() {
        let mut w = window();
        let about = w.location().resolve("/about").unwrap();
        HistoryBridge::commit(&mut w, &about, Some("About"), HistoryMode::Push).unwrap();

        assert_eq!(w.history().length(), 2);
        assert!(w.history().current().is_engine_owned());
        assert_eq!(w.history().current().title, "About");
        assert_eq!(w.location().pathname(), "/about");
    }

    #[test]
    fn test_replace_keeps_length() {
        let mut w = window();
        let home = w.location().url().clone();
        HistoryBridge::commit(&mut w, &home, None, HistoryMode::Replace).unwrap();

        assert_eq!(w.history().length(), 1);
        assert_eq!(w.history().current().title, "");
        assert_eq!(
            w.history().current().state.as_deref(),
            Some(r#"{"spa":true}"#)
        );
    }
}
