//! Transition applier
//!
//! Fades the content region out, swaps its children for the new page's,
//! and fades it back in. Nothing outside the region is touched apart from
//! the title, the scroll offset and the nav links' class.

use std::cell::RefCell;
use std::time::Duration;

use ferry_dom::{NodeId, Selector};
use url::Url;

use crate::config::NavConfig;
use crate::error::NavError;
use crate::extractor::Extraction;
use crate::window::Window;

/// What `apply` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The region now holds the new content
    Applied,
    /// Nothing to swap in; no DOM mutation
    NoContentRegion,
    /// A newer navigation took over during the fade
    Superseded,
}

/// Swaps one content region of one window
#[derive(Debug, Clone)]
pub struct TransitionApplier {
    region: NodeId,
    nav_links: Selector,
    active_class: String,
    duration: Duration,
    style: String,
}

impl TransitionApplier {
    pub fn new(region: NodeId, config: &NavConfig) -> Result<Self, NavError> {
        Ok(Self {
            region,
            nav_links: Selector::parse(&config.nav_link_selector)?,
            active_class: config.active_class.clone(),
            duration: config.transition_duration,
            style: config.transition_style(),
        })
    }

    /// The live content region
    pub fn region(&self) -> NodeId {
        self.region
    }

    /// Fade, wait, then swap unless `still_current` turned false meanwhile
    pub async fn apply(
        &self,
        window: &RefCell<Window>,
        extraction: &Extraction,
        url: &Url,
        still_current: impl Fn() -> bool,
    ) -> TransitionOutcome {
        let Some(page) = extraction.page() else {
            return TransitionOutcome::NoContentRegion;
        };

        {
            let mut window = window.borrow_mut();
            let tree = window.document_mut().tree_mut();
            tree.set_style_property(self.region, "transition", &self.style);
            tree.set_style_property(self.region, "opacity", "0");
        }

        smol::Timer::after(self.duration).await;

        if !still_current() {
            tracing::debug!("Swap to {} superseded", url);
            return TransitionOutcome::Superseded;
        }

        let mut window = window.borrow_mut();
        let document = window.document_mut();
        let tree = document.tree_mut();
        let removed = tree.remove_children(self.region);
        let source = page.document.tree();
        for (child, _) in source.children(page.region) {
            let copy = tree.import_subtree(source, child);
            tree.append_child(self.region, copy);
        }
        tracing::debug!(
            "Swapped region: {} nodes out, {} in",
            removed,
            source.child_ids(page.region).len()
        );

        if let Some(title) = &page.title {
            document.set_title(title);
        }
        document
            .tree_mut()
            .set_style_property(self.region, "opacity", "1");
        window.scroll_to(0.0, 0.0);
        self.update_active_links(&mut window, url);

        TransitionOutcome::Applied
    }

    /// Mark the nav links whose path equals the destination's
    fn update_active_links(&self, window: &mut Window, url: &Url) {
        let base = window.location().url().clone();
        let document = window.document_mut();
        for link in document.query_selector_all(&self.nav_links) {
            let tree = document.tree_mut();
            let active = tree
                .get_attribute(link, "href")
                .and_then(|href| base.join(href).ok())
                .is_some_and(|target| target.path() == url.path());
            tree.toggle_class(link, &self.active_class, active);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ContentExtractor;

    const SHELL: &str = r#"<html><head><title>Home</title></head><body>
        <canvas id="bg"></canvas>
        <nav><a href="/" class="active">Home</a><a href="/about">About</a></nav>
        <main id="content"><p>Welcome</p></main>
        </body></html>"#;

    fn setup(config: &NavConfig) -> (RefCell<Window>, TransitionApplier) {
        let url = Url::parse("https://labs.example/").unwrap();
        let window = Window::from_html(&url, SHELL);
        let region = window.document().get_element_by_id("content").unwrap();
        (
            RefCell::new(window),
            TransitionApplier::new(region, config).unwrap(),
        )
    }

    fn fast() -> NavConfig {
        NavConfig::builder()
            .transition(Duration::from_millis(1), "ease")
            .build()
    }

    #[test]
    fn test_swap_title_and_links() {
        let config = fast();
        let (window, applier) = setup(&config);
        window.borrow_mut().scroll_to(0.0, 640.0);
        let extraction = ContentExtractor::new(&config)
            .unwrap()
            .extract(r#"<div id="content">Hello</div><title>Hi</title>"#);
        let about = Url::parse("https://labs.example/about").unwrap();

        let outcome = smol::block_on(applier.apply(&window, &extraction, &about, || true));
        assert_eq!(outcome, TransitionOutcome::Applied);

        let window = window.borrow();
        let doc = window.document();
        let tree = doc.tree();
        assert_eq!(tree.text_content(applier.region()), "Hello");
        assert_eq!(doc.title().as_deref(), Some("Hi"));
        assert_eq!(tree.style_property(applier.region(), "opacity").as_deref(), Some("1"));
        assert_eq!(
            tree.style_property(applier.region(), "transition").as_deref(),
            Some("opacity 1ms ease")
        );
        assert_eq!(window.scroll_position(), (0.0, 0.0));

        let links = doc.query_selector_all(&Selector::parse("nav a").unwrap());
        assert!(!tree.has_class(links[0], "active"));
        assert!(tree.has_class(links[1], "active"));
    }

    #[test]
    fn test_no_region_leaves_dom_alone() {
        let config = fast();
        let (window, applier) = setup(&config);
        let about = Url::parse("https://labs.example/about").unwrap();

        let outcome = smol::block_on(applier.apply(
            &window,
            &Extraction::NoContentRegion,
            &about,
            || true,
        ));

        assert_eq!(outcome, TransitionOutcome::NoContentRegion);
        let window = window.borrow();
        let tree = window.document().tree();
        assert_eq!(tree.text_content(applier.region()), "Welcome");
        assert!(!tree.has_attribute(applier.region(), "style"));
    }

    #[test]
    fn test_superseded_swap_skipped() {
        let config = fast();
        let (window, applier) = setup(&config);
        let extraction = ContentExtractor::new(&config)
            .unwrap()
            .extract(r#"<div id="content">Late</div>"#);
        let about = Url::parse("https://labs.example/about").unwrap();

        let outcome = smol::block_on(applier.apply(&window, &extraction, &about, || false));

        assert_eq!(outcome, TransitionOutcome::Superseded);
        let window = window.borrow();
        assert_eq!(window.document().tree().text_content(applier.region()), "Welcome");
        assert_eq!(window.document().title().as_deref(), Some("Home"));
    }

    #[test]
    fn test_title_kept_when_absent() {
        let config = fast();
        let (window, applier) = setup(&config);
        let extraction = ContentExtractor::new(&config)
            .unwrap()
            .extract(r#"<main id="content"><h1>Untitled</h1></main>"#);
        let url = Url::parse("https://labs.example/untitled").unwrap();

        smol::block_on(applier.apply(&window, &extraction, &url, || true));
        assert_eq!(window.borrow().document().title().as_deref(), Some("Home"));
    }
}
