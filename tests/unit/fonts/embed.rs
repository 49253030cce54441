use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use super::*;
use crate::foundation::error::BadgeError;

#[derive(Default)]
struct MemoryFetcher {
    texts: HashMap<String, String>,
    bytes: HashMap<String, Vec<u8>>,
    calls: AtomicUsize,
}

impl FontFetcher for MemoryFetcher {
    fn fetch_text(&self, url: &str) -> BadgeResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts
            .get(url)
            .cloned()
            .ok_or_else(|| BadgeError::font_fetch(format!("404 {url}")))
    }

    fn fetch_bytes(&self, url: &str) -> BadgeResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bytes
            .get(url)
            .cloned()
            .ok_or_else(|| BadgeError::font_fetch(format!("404 {url}")))
    }
}

const TTF: &[u8] = &[0, 1, 0, 0, 9, 9];

fn fetcher() -> MemoryFetcher {
    let mut f = MemoryFetcher::default();
    f.texts.insert(
        "https://fonts.example/css?family=A".into(),
        "@font-face { font-family: 'A'; src: url(https://fonts.example/a.ttf) format('truetype'); }\n".into(),
    );
    f.texts.insert(
        "https://fonts.example/css/b.css".into(),
        "@font-face { font-family: 'B'; src: url(\"files/b.woff2\"); }".into(),
    );
    f.bytes.insert("https://fonts.example/a.ttf".into(), TTF.to_vec());
    f.bytes
        .insert("https://fonts.example/css/files/b.woff2".into(), b"wOF2rest".to_vec());
    f
}

#[test]
fn reachable_import_becomes_inline_font_face() {
    let embedder = FontEmbedder::new(Arc::new(fetcher()));
    let out = embedder.embed("@import url('https://fonts.example/css?family=A');\ntext{fill:red}");

    assert!(!out.css.contains("@import"), "{}", out.css);
    assert!(out.css.contains("@font-face"));
    assert!(out.css.contains("url(data:font/ttf;base64,AAEAAAkJ)"), "{}", out.css);
    assert!(out.css.ends_with("text{fill:red}"));
    assert_eq!(out.fonts.len(), 1);
    assert_eq!(out.fonts[0].mime, "font/ttf");
    assert!(out.fonts[0].is_loadable());
    assert!(out.failed.is_empty());
}

#[test]
fn failing_import_keeps_original_rule_independently() {
    let embedder = FontEmbedder::new(Arc::new(fetcher()));
    let css = "@import url('https://fonts.example/missing');\n@import \"https://fonts.example/css/b.css\";\n";
    let out = embedder.embed(css);

    assert!(out.css.starts_with("@import url('https://fonts.example/missing');"));
    assert_eq!(out.failed, vec!["https://fonts.example/missing".to_string()]);
    assert!(out.css.contains("data:font/woff2;base64,"));
    assert_eq!(out.fonts.len(), 1);
    assert!(!out.fonts[0].is_loadable());
}

#[test]
fn font_binary_failure_fails_the_whole_import() {
    let mut f = fetcher();
    f.bytes.clear();
    let out = FontEmbedder::new(Arc::new(f)).embed("@import url(https://fonts.example/css?family=A);");
    assert_eq!(out.css, "@import url(https://fonts.example/css?family=A);");
    assert_eq!(out.failed.len(), 1);
    assert!(out.fonts.is_empty());
}

#[test]
fn css_without_imports_is_untouched() {
    let f = Arc::new(fetcher());
    let out = FontEmbedder::new(f.clone()).embed("text { font-weight: bold }");
    assert_eq!(out.css, "text { font-weight: bold }");
    assert_eq!(f.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn mime_sniffing_prefers_magic_bytes() {
    assert_eq!(sniff_font_mime(b"wOFFxxxx", "a.ttf"), "font/woff");
    assert_eq!(sniff_font_mime(b"OTTOxxxx", "a"), "font/otf");
    assert_eq!(sniff_font_mime(&[0, 1, 0, 0], "a"), "font/ttf");
    assert_eq!(sniff_font_mime(b"??", "https://x/a.WOFF2?v=1"), "font/woff2");
    assert_eq!(sniff_font_mime(b"", "https://x/a"), "application/octet-stream");
}

#[test]
fn relative_urls_resolve_against_stylesheet() {
    assert_eq!(
        resolve_url("https://h.example/css/s.css?x=1", "f/a.ttf"),
        "https://h.example/css/f/a.ttf"
    );
    assert_eq!(resolve_url("https://h.example/css/s.css", "/a.ttf"), "https://h.example/a.ttf");
    assert_eq!(resolve_url("http://h.example/s.css", "//cdn.example/a.ttf"), "http://cdn.example/a.ttf");
    assert_eq!(resolve_url("https://h.example", "a.ttf"), "https://h.example/a.ttf");
}
