//! Script reexecutor
//!
//! Markup inserted by a swap is inert, so the scripts it carried are
//! re-created as fresh `script` elements on `body` and run there. Inline
//! scripts run as soon as they are inserted; external ones once their
//! source has loaded. Every element is removed again after it has run or
//! failed.

use std::cell::RefCell;

use ferry_dom::NodeId;
use ferry_js::ScriptRuntime;
use ferry_net::{Fetcher, PageLoader, PageRequest};
use url::Url;

use crate::error::ScriptError;
use crate::extractor::ScriptDirective;
use crate::window::Window;

/// Executes classic script source
pub trait ScriptRunner {
    /// Run `source`; `origin` names it in diagnostics
    fn execute(&self, source: &str, origin: &str) -> Result<(), ScriptError>;
}

impl ScriptRunner for ScriptRuntime {
    fn execute(&self, source: &str, origin: &str) -> Result<(), ScriptError> {
        self.eval(source, origin).map_err(ScriptError::from)
    }
}

impl<R: ScriptRunner> ScriptRunner for &R {
    fn execute(&self, source: &str, origin: &str) -> Result<(), ScriptError> {
        (**self).execute(source, origin)
    }
}

/// Result of one re-execution pass
#[derive(Debug, Default)]
pub struct ScriptReport {
    /// Scripts that ran to completion
    pub executed: usize,
    /// Scripts that failed to resolve, load or run
    pub failures: Vec<ScriptError>,
    /// External scripts dropped because a newer navigation started
    pub skipped: usize,
}

impl ScriptReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.skipped == 0
    }
}

struct PendingScript {
    element: NodeId,
    url: Url,
}

/// Runs the script effect list of a committed swap
pub struct ScriptReexecutor<'a, F, R> {
    window: &'a RefCell<Window>,
    loader: &'a PageLoader<F>,
    runner: &'a R,
}

impl<'a, F: Fetcher, R: ScriptRunner> ScriptReexecutor<'a, F, R> {
    pub fn new(window: &'a RefCell<Window>, loader: &'a PageLoader<F>, runner: &'a R) -> Self {
        Self {
            window,
            loader,
            runner,
        }
    }

    /// Run `scripts` for the page at `base`. External loads stop short of
    /// executing once `still_current` turns false.
    pub async fn run(
        &self,
        base: &Url,
        scripts: &[ScriptDirective],
        still_current: impl Fn() -> bool,
    ) -> ScriptReport {
        let mut report = ScriptReport::default();
        let mut pending = Vec::new();

        for (index, directive) in scripts.iter().enumerate() {
            match directive {
                ScriptDirective::Inline { code } => {
                    let element = self.insert(|tree, el| {
                        let text = tree.create_text(code);
                        tree.append_child(el, text);
                    });
                    let origin = format!("inline-script:{} ({})", index + 1, base);
                    self.record(&mut report, self.runner.execute(code, &origin));
                    self.remove(element);
                }
                ScriptDirective::External { src } => match base.join(src) {
                    Ok(url) => {
                        let element = self.insert(|tree, el| {
                            tree.set_attribute(el, "src", url.as_str());
                        });
                        pending.push(PendingScript { element, url });
                    }
                    Err(source) => {
                        self.record(
                            &mut report,
                            Err(ScriptError::BadUrl {
                                src: src.clone(),
                                source,
                            }),
                        );
                    }
                },
            }
        }

        for script in pending {
            let loaded = self.loader.fetch_bounded(&PageRequest::script(&script.url)).await;
            if !still_current() {
                report.skipped += 1;
                self.remove(script.element);
                continue;
            }
            let result = loaded
                .map_err(|source| ScriptError::Load {
                    src: script.url.to_string(),
                    source,
                })
                .and_then(|code| self.runner.execute(&code, script.url.as_str()));
            self.record(&mut report, result);
            self.remove(script.element);
        }

        tracing::debug!(
            "Scripts: {} executed, {} failed, {} skipped",
            report.executed,
            report.failures.len(),
            report.skipped
        );
        report
    }

    fn record(&self, report: &mut ScriptReport, result: Result<(), ScriptError>) {
        match result {
            Ok(()) => report.executed += 1,
            Err(e) => {
                tracing::warn!("{}", e);
                report.failures.push(e);
            }
        }
    }

    /// Append a fresh `script` element to body
    fn insert(&self, fill: impl FnOnce(&mut ferry_dom::DomTree, NodeId)) -> NodeId {
        let mut window = self.window.borrow_mut();
        let document = window.document_mut();
        let body = document.body();
        let tree = document.tree_mut();
        let element = tree.create_element("script");
        fill(tree, element);
        tree.append_child(body, element);
        element
    }

    fn remove(&self, element: NodeId) {
        self.window
            .borrow_mut()
            .document_mut()
            .tree_mut()
            .detach(element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_net::{CachePolicy, NetError};

    /// Records what it ran and how many script elements body held then
    struct RecordingRunner<'w> {
        window: &'w RefCell<Window>,
        ran: RefCell<Vec<(String, usize)>>,
    }

    impl ScriptRunner for RecordingRunner<'_> {
        fn execute(&self, source: &str, _origin: &str) -> Result<(), ScriptError> {
            let attached = script_count(self.window);
            self.ran.borrow_mut().push((source.to_string(), attached));
            if source.contains("throw") {
                return Err(ScriptError::Execution("thrown".into()));
            }
            Ok(())
        }
    }

    struct ScriptFetcher;

    impl Fetcher for ScriptFetcher {
        async fn fetch(&self, request: &PageRequest) -> Result<String, NetError> {
            match request.url.path() {
                "/js/ok.js" => Ok("external()".into()),
                _ => Err(NetError::HttpError { status: 404 }),
            }
        }
    }

    fn script_count(window: &RefCell<Window>) -> usize {
        let window = window.borrow();
        let doc = window.document();
        doc.tree()
            .children(doc.body())
            .filter(|(id, _)| doc.tree().is_element_named(*id, "script"))
            .count()
    }

    fn window() -> RefCell<Window> {
        let url = Url::parse("https://labs.example/post").unwrap();
        RefCell::new(Window::from_html(&url, "<main id=\"content\"></main>"))
    }

    #[test]
    fn test_failures_isolated_and_nodes_removed() {
        let window = window();
        let loader = PageLoader::new(ScriptFetcher, CachePolicy::Session);
        let runner = RecordingRunner {
            window: &window,
            ran: RefCell::new(Vec::new()),
        };
        let base = window.borrow().location().url().clone();
        let scripts = vec![
            ScriptDirective::Inline { code: "throw 1".into() },
            ScriptDirective::External { src: "/js/missing.js".into() },
            ScriptDirective::Inline { code: "second()".into() },
            ScriptDirective::External { src: "js/ok.js".into() },
        ];

        let reexecutor = ScriptReexecutor::new(&window, &loader, &runner);
        let report = smol::block_on(reexecutor.run(&base, &scripts, || true));

        assert_eq!(report.executed, 2);
        assert_eq!(report.failures.len(), 2);
        assert!(matches!(report.failures[1], ScriptError::Load { .. }));

        let ran: Vec<_> = runner.ran.borrow().iter().map(|(s, _)| s.clone()).collect();
        assert_eq!(ran, vec!["throw 1", "second()", "external()"]);
        assert_eq!(script_count(&window), 0);
    }

    #[test]
    fn test_inline_runs_while_attached() {
        let window = window();
        let loader = PageLoader::new(ScriptFetcher, CachePolicy::Session);
        let runner = RecordingRunner {
            window: &window,
            ran: RefCell::new(Vec::new()),
        };
        let base = window.borrow().location().url().clone();
        let scripts = vec![ScriptDirective::Inline { code: "a()".into() }];

        let reexecutor = ScriptReexecutor::new(&window, &loader, &runner);
        smol::block_on(reexecutor.run(&base, &scripts, || true));

        assert_eq!(runner.ran.borrow()[0], ("a()".to_string(), 1));
    }

    #[test]
    fn test_superseded_externals_skipped() {
        let window = window();
        let loader = PageLoader::new(ScriptFetcher, CachePolicy::Session);
        let runner = RecordingRunner {
            window: &window,
            ran: RefCell::new(Vec::new()),
        };
        let base = window.borrow().location().url().clone();
        let scripts = vec![ScriptDirective::External { src: "/js/ok.js".into() }];

        let reexecutor = ScriptReexecutor::new(&window, &loader, &runner);
        let report = smol::block_on(reexecutor.run(&base, &scripts, || false));

        assert_eq!(report.skipped, 1);
        assert!(runner.ran.borrow().is_empty());
        assert_eq!(script_count(&window), 0);
    }

    #[test]
    fn test_runtime_runner() {
        let runtime = ScriptRuntime::new().unwrap();
        runtime.execute("var ran = 'yes';", "inline").unwrap();
        assert_eq!(runtime.global_string("ran").as_deref(), Some("yes"));
        assert!(matches!(
            runtime.execute("throw new Error('x')", "inline"),
            Err(ScriptError::Execution(_))
        ));
    }
}
