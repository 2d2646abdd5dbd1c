//! Window
//!
//! The page shell the engine runs in: the live document, its location, the
//! session history and the viewport scroll offset. Back/forward traversals
//! move the history and location and hand a `PopStateEvent` to the caller,
//! which dispatches it to the engine.

use ferry_dom::Document;
use url::Url;

use crate::history::SessionHistory;
use crate::location::Location;

/// Fired after a history traversal has moved the current entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopStateEvent {
    pub url: Url,
    pub state: Option<String>,
}

/// Browsing context of one loaded page
#[derive(Debug)]
pub struct Window {
    document: Document,
    location: Location,
    history: SessionHistory,
    scroll: (f64, f64),
    spa_installed: bool,
}

impl Window {
    /// Wrap an already parsed document loaded from `url`
    pub fn new(document: Document, url: Url) -> Self {
        let title = document.title().unwrap_or_default();
        Self {
            document,
            history: SessionHistory::new(url.clone(), &title),
            location: Location::new(url),
            scroll: (0.0, 0.0),
            spa_installed: false,
        }
    }

    /// Parse `html` as the page loaded from `url`
    pub fn from_html(url: &Url, html: &str) -> Self {
        let document = ferry_html::parse_with_url(html, url.as_str());
        tracing::debug!("Loaded {} ({} nodes)", url, document.tree.len());
        Self::new(document, url.clone())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut SessionHistory {
        &mut self.history
    }

    /// window.scrollTo
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll = (x, y);
    }

    pub fn scroll_position(&self) -> (f64, f64) {
        self.scroll
    }

    /// history.back()
    pub fn back(&mut self) -> Option<PopStateEvent> {
        self.go(-1)
    }

    /// history.forward()
    pub fn forward(&mut self) -> Option<PopStateEvent> {
        self.go(1)
    }

    /// history.go(delta)
    pub fn go(&mut self, delta: isize) -> Option<PopStateEvent> {
        let entry = self.history.go(delta)?;
        let event = PopStateEvent {
            url: entry.url.clone(),
            state: entry.state.clone(),
        };
        self.location.set_url(event.url.clone());
        tracing::debug!("History traversal by {} to {}", delta, event.url);
        Some(event)
    }

    pub fn is_spa_installed(&self) -> bool {
        self.spa_installed
    }

    /// Set the install flag, returning false if it was already set
    pub(crate) fn mark_spa_installed(&mut self) -> bool {
        !std::mem::replace(&mut self.spa_installed, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Window {
        let url = Url::parse("https://labs.example/").unwrap();
        Window::from_html(
            &url,
            "<title>Home</title><main id=\"content\">Welcome</main>",
        )
    }

    #[test]
    fn test_initial_entry() {
        let w = window();
        assert_eq!(w.history().length(), 1);
        assert_eq!(w.history().current().title, "Home");
        assert_eq!(w.location().pathname(), "/");
    }

    #[test]
    fn test_traversal_moves_location() {
        let mut w = window();
        let about = w.location().resolve("/about").unwrap();
        w.history_mut()
            .push_state(None, "About".into(), about.clone());
        w.location_mut().set_url(about);

        let event = w.back().unwrap();
        assert_eq!(event.url.path(), "/");
        assert_eq!(w.location().pathname(), "/");
        assert!(w.back().is_none());

        let event = w.forward().unwrap();
        assert_eq!(event.url.path(), "/about");
    }

    #[test]
    fn test_install_flag() {
        let mut w = window();
        assert!(w.mark_spa_installed());
        assert!(!w.mark_spa_installed());
        assert!(w.is_spa_installed());
    }
}
