//! Ferry - site navigation previewer
//!
//! Loads a built site directory, installs the navigation engine on its
//! index page and walks the given paths the way a visitor clicking links
//! would, printing the page after every step.
//!
//! ```text
//! ferry _site /about /posts/hello back forward
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Context};
use ferry_dom::{ClickEvent, NodeId, Selector};
use ferry_js::ScriptRuntime;
use ferry_nav::{
    Fetcher, NavConfig, NavigationEngine, NavigationOutcome, NavigationRequest, PageRequest,
    Window,
};
use ferry_net::DirectoryFetcher;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Origin the site directory is served as
const SITE_ORIGIN: &str = "http://localhost:4000/";

type Engine = NavigationEngine<DirectoryFetcher, ScriptRuntime>;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(site_dir) = args.next() else {
        bail!("usage: ferry <site-dir> [path | back | forward]...");
    };
    let steps: Vec<String> = args.collect();

    let origin = Url::parse(SITE_ORIGIN)?;
    let fetcher = DirectoryFetcher::new(&site_dir, &origin);
    let mut engine = smol::block_on(install(fetcher, &origin, NavConfig::default()))
        .with_context(|| format!("cannot open the index page of {site_dir}"))?;

    print_page(&engine, "load");
    for step in &steps {
        let outcome = smol::block_on(run_step(&engine, step))?;
        match outcome {
            Some(NavigationOutcome::FellBack(e)) => {
                println!("  -> full page load ({e})");
                // A full load replaces the document, so the engine starts over
                match smol::block_on(reload(&engine)) {
                    Ok(fresh) => engine = fresh,
                    Err(e) => {
                        println!("  -> stopping here: {e:#}");
                        break;
                    }
                }
            }
            Some(NavigationOutcome::Failed(e)) => println!("  -> failed ({e})"),
            Some(_) => {}
            None => println!("  -> nothing to do"),
        }
        print_page(&engine, step);
    }

    Ok(())
}

/// Load `url` as a fresh window and install the engine on it
async fn install(
    fetcher: DirectoryFetcher,
    url: &Url,
    config: NavConfig,
) -> anyhow::Result<Engine> {
    let html = fetcher
        .fetch(&PageRequest::navigation(url))
        .await
        .with_context(|| format!("failed to load {url}"))?;

    let window = Rc::new(RefCell::new(Window::from_html(url, &html)));
    let runtime = ScriptRuntime::new().context("failed to start the script runtime")?;
    NavigationEngine::initialize(window, fetcher, runtime, config)
        .with_context(|| format!("cannot navigate in-page from {url}"))
}

/// Perform the full page load a fallback asked for
async fn reload(engine: &Engine) -> anyhow::Result<Engine> {
    let target = engine
        .window()
        .borrow()
        .location()
        .pending_load()
        .cloned()
        .context("no page load pending")?;
    let fetcher = engine.loader().fetcher().clone();
    install(fetcher, &target, engine.config().clone()).await
}

async fn run_step(engine: &Engine, step: &str) -> anyhow::Result<Option<NavigationOutcome>> {
    let traversal = match step {
        "back" => Some(engine.window().borrow_mut().back()),
        "forward" => Some(engine.window().borrow_mut().forward()),
        _ => None,
    };
    if let Some(event) = traversal {
        return Ok(match event {
            Some(event) => Some(engine.on_pop_state(&event).await),
            None => None,
        });
    }

    let target = engine
        .window()
        .borrow()
        .location()
        .resolve(step)
        .with_context(|| format!("bad path {step:?}"))?;

    // Prefer clicking a matching link so the interceptor decides
    match find_link(engine, &target)? {
        Some(link) => {
            let mut event = ClickEvent::primary(link);
            let outcome = engine.on_click(&mut event).await;
            if outcome.is_none() {
                println!("  -> link to {target} left to native navigation");
            }
            Ok(outcome)
        }
        None => Ok(Some(engine.navigate(NavigationRequest::push(target)).await)),
    }
}

fn find_link(engine: &Engine, target: &Url) -> anyhow::Result<Option<NodeId>> {
    let links = Selector::parse("a[href]")?;
    let window = engine.window().borrow();
    let document = window.document();
    let tree = document.tree();

    Ok(document.query_selector_all(&links).into_iter().find(|&link| {
        tree.get_attribute(link, "href")
            .and_then(|href| window.location().resolve(href).ok())
            .is_some_and(|url| url == *target)
    }))
}

fn print_page(engine: &Engine, step: &str) {
    let window = engine.window().borrow();
    let document = window.document();
    let text = document.tree().text_content(engine.region());
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    println!("== {step}");
    println!("  title:    {}", document.title().unwrap_or_default());
    println!("  location: {}", window.location().href());
    println!(
        "  history:  {}/{}",
        window.history().index() + 1,
        window.history().length()
    );
    println!("  cached:   {} pages", engine.cache().len());
    println!("  content:  {text}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    const SHELL: &str = r#"<html><head><title>Home</title></head><body>
        <nav><a href="/about">About</a> <a href="/plain">Plain</a></nav>
        <main id="content">Home</main>
        </body></html>"#;

    fn site_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ferry-bin-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.html"), SHELL).unwrap();
        fs::write(dir.join("plain.html"), "<title>Plain</title><p>No region</p>").unwrap();
        dir
    }

    fn open(dir: &PathBuf) -> Engine {
        let origin = Url::parse(SITE_ORIGIN).unwrap();
        let fetcher = DirectoryFetcher::new(dir, &origin);
        smol::block_on(install(fetcher, &origin, NavConfig::default())).unwrap()
    }

    fn region_text(engine: &Engine) -> String {
        let window = engine.window().borrow();
        window.document().tree().text_content(engine.region())
    }

    #[test]
    fn test_fallback_reloads_window() {
        let dir = site_dir("reload");
        let engine = open(&dir);

        // about.html shows up only after the in-page fetch failed
        let outcome = smol::block_on(run_step(&engine, "/about")).unwrap();
        assert!(matches!(outcome, Some(NavigationOutcome::FellBack(_))));
        fs::write(
            dir.join("about.html"),
            r#"<title>About</title><main id="content">About us</main>"#,
        )
        .unwrap();

        let fresh = smol::block_on(reload(&engine)).unwrap();
        let window = fresh.window().borrow();
        assert_eq!(window.location().pathname(), "/about");
        assert_eq!(window.document().title().as_deref(), Some("About"));
        assert!(window.location().pending_load().is_none());
        assert!(window.is_spa_installed());
        drop(window);
        assert_eq!(region_text(&fresh), "About us");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_fallback_to_page_without_region_stops() {
        let dir = site_dir("plain");
        let engine = open(&dir);

        let outcome = smol::block_on(run_step(&engine, "/plain")).unwrap();
        assert!(matches!(outcome, Some(NavigationOutcome::FellBack(_))));
        assert_eq!(region_text(&engine), "Home");

        assert!(smol::block_on(reload(&engine)).is_err());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_reload_without_fallback_refused() {
        let dir = site_dir("idle");
        let engine = open(&dir);
        assert!(smol::block_on(reload(&engine)).is_err());

        let _ = fs::remove_dir_all(&dir);
    }
}
