//! Ferry HTML Parser
//!
//! HTML5 parser built on html5ever. Parsing is inert: script elements end
//! up in the tree as plain elements and nothing is executed or loaded.

mod parser;

pub use ferry_dom::Document;
pub use parser::HtmlParser;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

/// Parse an HTML string fetched from `url`
pub fn parse_with_url(html: &str, url: &str) -> Document {
    HtmlParser::new().parse_with_url(html, url)
}
