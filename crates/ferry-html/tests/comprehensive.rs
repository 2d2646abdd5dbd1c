//! Comprehensive tests for ferry-html
//!
//! Parsing fetched pages the way the navigation engine sees them.

use ferry_dom::Selector;
use ferry_html::HtmlParser;

fn select(selector: &str) -> Selector {
    Selector::parse(selector).unwrap()
}

#[test]
fn test_parse_minimal_html() {
    let doc = HtmlParser::new().parse("");
    assert!(doc.tree().len() >= 1, "Even empty HTML should have root");
    assert!(doc.body().is_valid());
}

#[test]
fn test_site_page_shape() {
    let html = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>About | Jugaad Labs</title>
</head>
<body>
<canvas id="kaleidoscope"></canvas>
<nav class="site-nav"><a href="/">Home</a><a href="/about.html">About</a></nav>
<main id="content" class="site-main container"><h1>About</h1><p>We build things.</p></main>
</body>
</html>"#;

    let doc = HtmlParser::new().parse_with_url(html, "https://labs.example/about.html");
    let main = doc.query_selector(&select("#content")).unwrap();

    assert_eq!(doc.title().as_deref(), Some("About | Jugaad Labs"));
    assert_eq!(doc.tree().text_content(main), "AboutWe build things.");
    assert_eq!(doc.query_selector_all(&select(".site-nav a")).len(), 2);
    assert!(doc.get_element_by_id("kaleidoscope").is_some());
}

#[test]
fn test_title_after_content_in_body() {
    // A stray <title> in body content is still found by a document-wide query
    let doc = HtmlParser::new().parse(r#"<div id="content">Hello</div><title>Hi</title>"#);
    let content = doc.get_element_by_id("content").unwrap();

    assert_eq!(doc.tree().text_content(content), "Hello");
    assert_eq!(doc.title().as_deref(), Some("Hi"));
}

#[test]
fn test_scripts_stay_inert() {
    let html = r#"<main id="content">
        <script>window.ran = true;</script>
        <script src="/assets/js/widget.js"></script>
    </main>"#;
    let doc = HtmlParser::new().parse(html);
    let scripts = doc.query_selector_all(&select("#content script"));

    assert_eq!(scripts.len(), 2);
    assert_eq!(doc.tree().text_content(scripts[0]), "window.ran = true;");
    assert_eq!(
        doc.tree().get_attribute(scripts[1], "src"),
        Some("/assets/js/widget.js")
    );
}

#[test]
fn test_parse_malformed_html() {
    // HTML5 parser should handle malformed HTML gracefully
    let html = r#"
        <div id="content">
            <p>Unclosed paragraph
            <span>Unclosed span
        </div>
    "#;
    let doc = HtmlParser::new().parse(html);
    let content = doc.get_element_by_id("content").unwrap();
    assert!(doc.tree().text_content(content).contains("Unclosed span"));
}

#[test]
fn test_attributes_are_preserved() {
    let doc = HtmlParser::new().parse(r#"<a href="/x" target="_blank" data-no-spa>x</a>"#);
    let link = doc.query_selector(&select("a")).unwrap();

    assert_eq!(doc.tree().get_attribute(link, "target"), Some("_blank"));
    assert_eq!(doc.tree().get_attribute(link, "data-no-spa"), Some(""));
}
