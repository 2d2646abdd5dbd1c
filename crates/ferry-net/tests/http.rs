//! HttpFetcher against a local server
//!
//! A tiny HTTP/1.1 responder on a background thread records every request
//! it receives, so the tests can check what actually went over the wire.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use ferry_net::*;

type Log = Arc<Mutex<Vec<String>>>;

/// Start a server on an ephemeral port; returns its base URL and request log
fn serve() -> (Url, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let requests = log.clone();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            respond(stream, port, &requests);
        }
    });

    (Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap(), log)
}

fn respond(mut stream: TcpStream, port: u16, log: &Log) {
    let mut raw = Vec::new();
    let mut buf = [0u8; 1024];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => raw.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&raw).to_ascii_lowercase();
    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
    log.lock().unwrap().push(request);

    let (status, extra, body) = match path.as_str() {
        "/a" => ("200 OK", "Set-Cookie: sid=42; Path=/\r\n".to_string(), "<main id=\"content\">A</main>"),
        "/b" => ("200 OK", String::new(), "<main id=\"content\">B</main>"),
        "/fail" => ("500 Internal Server Error", String::new(), "oops"),
        "/inside" => ("302 Found", "Location: /b\r\n".to_string(), ""),
        "/away" => (
            "302 Found",
            format!("Location: http://localhost:{port}/b\r\n"),
            "",
        ),
        _ => ("404 Not Found", String::new(), "missing"),
    };
    let response = format!(
        "HTTP/1.1 {status}\r\n{extra}Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
}

fn navigation(site: &Url, path: &str) -> PageRequest {
    let (name, value) = DEFAULT_MARKER_HEADER;
    PageRequest::navigation(&site.join(path).unwrap()).with_header(name, value)
}

fn requests_for(log: &Log, path: &str) -> Vec<String> {
    let prefix = format!("get {path} ");
    log.lock()
        .unwrap()
        .iter()
        .filter(|r| r.starts_with(&prefix))
        .cloned()
        .collect()
}

#[test]
fn test_marker_header_sent() {
    let (site, log) = serve();
    let fetcher = HttpFetcher::new(&site).unwrap();

    let body = smol::block_on(fetcher.fetch(&navigation(&site, "/b"))).unwrap();
    assert_eq!(body, "<main id=\"content\">B</main>");

    let sent = requests_for(&log, "/b");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("x-requested-with: fetch"));
    assert!(sent[0].contains("user-agent: ferry/0.1"));
}

#[test]
fn test_cookies_sent_back() {
    let (site, log) = serve();
    let fetcher = HttpFetcher::new(&site).unwrap();

    smol::block_on(fetcher.fetch(&navigation(&site, "/a"))).unwrap();
    smol::block_on(fetcher.fetch(&navigation(&site, "/b"))).unwrap();

    assert!(!requests_for(&log, "/a")[0].contains("cookie:"));
    assert!(requests_for(&log, "/b")[0].contains("cookie: sid=42"));
}

#[test]
fn test_error_status_is_http_error() {
    let (site, _log) = serve();
    let fetcher = HttpFetcher::new(&site).unwrap();

    let result = smol::block_on(fetcher.fetch(&navigation(&site, "/fail")));
    assert!(matches!(result, Err(NetError::HttpError { status: 500 })));

    let result = smol::block_on(fetcher.fetch(&navigation(&site, "/nowhere")));
    assert!(matches!(result, Err(NetError::HttpError { status: 404 })));
}

#[test]
fn test_same_origin_redirect_followed() {
    let (site, log) = serve();
    let fetcher = HttpFetcher::new(&site).unwrap();

    let body = smol::block_on(fetcher.fetch(&navigation(&site, "/inside"))).unwrap();
    assert_eq!(body, "<main id=\"content\">B</main>");
    assert_eq!(requests_for(&log, "/b").len(), 1);
}

#[test]
fn test_cross_origin_redirect_stopped() {
    let (site, log) = serve();
    let fetcher = HttpFetcher::new(&site).unwrap();

    let result = smol::block_on(fetcher.fetch(&navigation(&site, "/away")));
    assert!(matches!(result, Err(NetError::HttpError { status: 302 })));
    assert!(requests_for(&log, "/b").is_empty());
}

#[test]
fn test_loader_caches_http_pages() {
    let (site, log) = serve();
    let loader = PageLoader::new(HttpFetcher::new(&site).unwrap(), CachePolicy::Session);
    let page = site.join("/b").unwrap();

    let first = smol::block_on(loader.load(&page)).unwrap();
    let second = smol::block_on(loader.load(&page)).unwrap();

    assert_eq!(first, second);
    let sent = requests_for(&log, "/b");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("x-requested-with: fetch"));
}
