//! Navigation engine
//!
//! Ties the pipeline together: click or popstate, then load (through the
//! page cache), extract, swap, commit history and run scripts. Failures
//! fall back to a full page load.
//!
//! Overlapping navigations resolve newest-wins. Every request takes a new
//! generation number, and each stage re-checks it before touching the
//! cache, the content region, history, the location or body scripts, so a
//! superseded request stops quietly at its next suspension point.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use ferry_dom::{ClickEvent, NodeId};
use ferry_net::{Fetcher, PageCache, PageLoader};

use crate::bridge::HistoryBridge;
use crate::config::NavConfig;
use crate::error::NavError;
use crate::extractor::ContentExtractor;
use crate::interceptor::{LinkInterceptor, NavigationRequest};
use crate::scripts::{ScriptReexecutor, ScriptReport, ScriptRunner};
use crate::transition::{TransitionApplier, TransitionOutcome};
use crate::window::{PopStateEvent, Window};

/// How a navigation ended
#[derive(Debug)]
pub enum NavigationOutcome {
    /// Swapped in place and recorded in history
    Committed(ScriptReport),
    /// Abandoned in favour of a full page load
    FellBack(NavError),
    /// The swap happened but history could not be written
    Failed(NavError),
    /// A newer navigation took over
    Superseded,
}

impl NavigationOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// In-page navigation engine of one window
pub struct NavigationEngine<F: Fetcher, R: ScriptRunner> {
    window: Rc<RefCell<Window>>,
    loader: PageLoader<F>,
    runner: R,
    config: NavConfig,
    interceptor: LinkInterceptor,
    extractor: ContentExtractor,
    transition: TransitionApplier,
    generation: Cell<u64>,
}

impl<F: Fetcher, R: ScriptRunner> NavigationEngine<F, R> {
    /// Install the engine on `window`. Fails if one is already installed or
    /// the shell has no content region.
    pub fn initialize(
        window: Rc<RefCell<Window>>,
        fetcher: F,
        runner: R,
        config: NavConfig,
    ) -> Result<Self, NavError> {
        let extractor = ContentExtractor::new(&config)?;
        let transition = {
            let mut shell = window.borrow_mut();
            let region = shell
                .document()
                .query_selector(extractor.selector())
                .ok_or_else(|| NavError::NoContentRegion(config.content_selector.clone()))?;
            let transition = TransitionApplier::new(region, &config)?;
            // Only a shell that is fully usable gets marked
            if !shell.mark_spa_installed() {
                return Err(NavError::AlreadyInstalled);
            }
            transition
        };

        let loader = PageLoader::new(fetcher, config.cache_policy)
            .with_marker(config.marker_header.clone())
            .with_timeout(config.fetch_timeout);

        tracing::info!(
            "Navigation engine installed on {} (region {})",
            window.borrow().location().href(),
            config.content_selector
        );

        Ok(Self {
            window,
            loader,
            runner,
            interceptor: LinkInterceptor::new(&config),
            extractor,
            transition,
            config,
            generation: Cell::new(0),
        })
    }

    pub fn window(&self) -> &Rc<RefCell<Window>> {
        &self.window
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// The live content region
    pub fn region(&self) -> NodeId {
        self.transition.region()
    }

    pub fn cache(&self) -> Ref<'_, PageCache> {
        self.loader.cache()
    }

    pub fn loader(&self) -> &PageLoader<F> {
        &self.loader
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Filter a click; intercepted clicks get their default prevented
    pub fn handle_click(&self, event: &mut ClickEvent) -> Option<NavigationRequest> {
        let window = self.window.borrow();
        self.interceptor
            .intercept(window.document(), window.location(), event)
    }

    /// Document click listener
    pub async fn on_click(&self, event: &mut ClickEvent) -> Option<NavigationOutcome> {
        let request = self.handle_click(event)?;
        Some(self.navigate(request).await)
    }

    /// The request replaying a traversal: the current location, in place
    pub fn handle_pop_state(&self, event: &PopStateEvent) -> NavigationRequest {
        tracing::debug!("popstate to {} (state {:?})", event.url, event.state);
        let url = self.window.borrow().location().url().clone();
        NavigationRequest::replace(url)
    }

    /// Window popstate listener
    pub async fn on_pop_state(&self, event: &PopStateEvent) -> NavigationOutcome {
        let request = self.handle_pop_state(event);
        self.navigate(request).await
    }

    /// Run the full pipeline for `request`
    pub async fn navigate(&self, request: NavigationRequest) -> NavigationOutcome {
        let token = self.generation.get().wrapping_add(1);
        self.generation.set(token);
        tracing::info!("Navigating to {} ({:?})", request.url, request.mode);

        match self.run_pipeline(&request, token).await {
            Ok(Some(report)) => {
                tracing::info!("Committed {}", request.url);
                NavigationOutcome::Committed(report)
            }
            Ok(None) => NavigationOutcome::Superseded,
            Err(_) if !self.is_current(token) => NavigationOutcome::Superseded,
            Err(e) if e.falls_back() => {
                tracing::warn!(
                    "In-page navigation to {} failed, falling back to full navigation: {}",
                    request.url,
                    e
                );
                self.window
                    .borrow_mut()
                    .location_mut()
                    .assign(request.url.clone());
                NavigationOutcome::FellBack(e)
            }
            Err(e) => {
                tracing::warn!("Navigation to {} failed: {}", request.url, e);
                NavigationOutcome::Failed(e)
            }
        }
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.get() == token
    }

    async fn run_pipeline(
        &self,
        request: &NavigationRequest,
        token: u64,
    ) -> Result<Option<ScriptReport>, NavError> {
        let still_current = || self.is_current(token);

        let markup = self.loader.load_if(&request.url, still_current).await?;
        if !still_current() {
            return Ok(None);
        }

        let extraction = self.extractor.extract(&markup);
        let outcome = self
            .transition
            .apply(&self.window, &extraction, &request.url, still_current)
            .await;
        match outcome {
            TransitionOutcome::Applied => {}
            TransitionOutcome::Superseded => return Ok(None),
            TransitionOutcome::NoContentRegion => {
                return Err(NavError::MalformedResponse {
                    selector: self.extractor.selector_source().to_string(),
                });
            }
        }

        let Some(page) = extraction.page() else {
            return Ok(None);
        };
        HistoryBridge::commit(
            &mut self.window.borrow_mut(),
            &request.url,
            page.title.as_deref(),
            request.mode,
        )?;

        let report = ScriptReexecutor::new(&self.window, &self.loader, &self.runner)
            .run(&request.url, &page.scripts, still_current)
            .await;
        Ok(Some(report))
    }
}
