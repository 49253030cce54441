use std::{collections::BTreeMap, sync::Arc, sync::LazyLock};

use base64::Engine as _;
use rayon::prelude::*;
use regex::Regex;

use crate::{
    fonts::fetch::{FontFetcher, HttpFontFetcher},
    foundation::{config::FontPolicy, error::BadgeResult},
};

static IMPORT_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@import\s+(?:url\(\s*['"]?([^'")\s]+)['"]?\s*\)|['"]([^'"]+)['"])[^;]*;?"#)
        .expect("static @import regex")
});

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*['"]?([^'")\s]+)['"]?\s*\)"#).expect("static css url regex")
});

/// A font binary inlined into the stylesheet.
#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddedFont {
    pub url: String,
    pub mime: &'static str,
    pub data: Arc<Vec<u8>>,
}

impl EmbeddedFont {
    /// Whether the rasterizer's font database can load this binary directly.
    pub fn is_loadable(&self) -> bool {
        matches!(self.mime, "font/ttf" | "font/otf" | "font/collection")
    }
}

/// Result of [`FontEmbedder::embed`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmbedOutcome {
    /// Input CSS with each successfully fetched `@import` replaced by inline rules.
    pub css: String,
    pub fonts: Vec<EmbeddedFont>,
    /// Stylesheet URLs whose `@import` was kept because fetching failed.
    pub failed: Vec<String>,
}

/// Converts `@import` stylesheets into self-contained `@font-face` rules with `data:` URIs.
#[derive(Clone)]
pub struct FontEmbedder {
    fetcher: Arc<dyn FontFetcher>,
}

impl std::fmt::Debug for FontEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontEmbedder").finish_non_exhaustive()
    }
}

struct InlinedImport {
    css: String,
    fonts: Vec<EmbeddedFont>,
}

impl FontEmbedder {
    pub fn new(fetcher: Arc<dyn FontFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn http(policy: &FontPolicy) -> Self {
        Self::new(Arc::new(HttpFontFetcher::new(policy)))
    }

    /// Inline every `@import` of `css`.
    ///
    /// Imports are fetched in parallel and independently: a failing import keeps its original
    /// rule text and is listed in [`EmbedOutcome::failed`]. Everything else in `css` is kept as
    /// written.
    #[tracing::instrument(skip_all, fields(css_len = css.len()))]
    pub fn embed(&self, css: &str) -> EmbedOutcome {
        let imports: Vec<(std::ops::Range<usize>, String)> = IMPORT_RULE
            .captures_iter(css)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let url = caps.get(1).or_else(|| caps.get(2))?;
                Some((whole.range(), url.as_str().to_string()))
            })
            .collect();

        let results: Vec<BadgeResult<InlinedImport>> = imports
            .par_iter()
            .map(|(_, url)| self.inline_import(url))
            .collect();

        let mut outcome = EmbedOutcome::default();
        let mut cursor = 0;
        for ((range, url), result) in imports.iter().zip(results) {
            outcome.css.push_str(&css[cursor..range.start]);
            match result {
                Ok(inlined) => {
                    outcome.css.push_str(inlined.css.trim_end());
                    outcome.css.push('\n');
                    outcome.fonts.extend(inlined.fonts);
                }
                Err(err) => {
                    tracing::warn!(url = %url, error = %err, "font import kept unembedded");
                    outcome.css.push_str(&css[range.clone()]);
                    outcome.failed.push(url.clone());
                }
            }
            cursor = range.end;
        }
        outcome.css.push_str(&css[cursor..]);
        tracing::debug!(
            imports = imports.len(),
            fonts = outcome.fonts.len(),
            failed = outcome.failed.len(),
            "fonts embedded"
        );
        outcome
    }

    fn inline_import(&self, stylesheet_url: &str) -> BadgeResult<InlinedImport> {
        let sheet = self.fetcher.fetch_text(stylesheet_url)?;

        let mut fetched: BTreeMap<String, EmbeddedFont> = BTreeMap::new();
        for caps in CSS_URL.captures_iter(&sheet) {
            let raw = &caps[1];
            if raw.starts_with("data:") || fetched.contains_key(raw) {
                continue;
            }
            let url = resolve_url(stylesheet_url, raw);
            let data = self.fetcher.fetch_bytes(&url)?;
            let mime = sniff_font_mime(&data, &url);
            fetched.insert(
                raw.to_string(),
                EmbeddedFont {
                    url,
                    mime,
                    data: Arc::new(data),
                },
            );
        }

        let css = CSS_URL
            .replace_all(&sheet, |caps: &regex::Captures<'_>| {
                match fetched.get(&caps[1]) {
                    Some(font) => format!("url({})", data_uri(font.mime, &font.data)),
                    None => caps[0].to_string(),
                }
            })
            .into_owned();

        Ok(InlinedImport {
            css,
            fonts: fetched.into_values().collect(),
        })
    }
}

/// `data:<mime>;base64,<payload>`.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Resolve a stylesheet-relative reference against the stylesheet URL.
fn resolve_url(base: &str, reference: &str) -> String {
    if reference.contains("://") {
        return reference.to_string();
    }
    if let Some(rest) = reference.strip_prefix("//") {
        let scheme = base.split("://").next().unwrap_or("https");
        return format!("{scheme}://{rest}");
    }
    let Some((scheme, after)) = base.split_once("://") else {
        return reference.to_string();
    };
    let authority_end = after.find('/').unwrap_or(after.len());
    let origin = format!("{scheme}://{}", &after[..authority_end]);
    if reference.starts_with('/') {
        return format!("{origin}{reference}");
    }
    let path = after[authority_end..]
        .split(['?', '#'])
        .next()
        .unwrap_or("");
    let dir = &path[..path.rfind('/').map(|i| i + 1).unwrap_or(0)];
    let dir = if dir.is_empty() { "/" } else { dir };
    format!("{origin}{dir}{reference}")
}

/// Font MIME type from magic bytes, falling back to the URL extension.
pub fn sniff_font_mime(bytes: &[u8], url: &str) -> &'static str {
    match bytes.get(..4) {
        Some(b"wOF2") => return "font/woff2",
        Some(b"wOFF") => return "font/woff",
        Some(b"OTTO") => return "font/otf",
        Some(b"ttcf") => return "font/collection",
        Some([0, 1, 0, 0]) | Some(b"true") => return "font/ttf",
        _ => {}
    }
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "woff2" => "font/woff2",
        "woff" => "font/woff",
        "otf" => "font/otf",
        "ttf" => "font/ttf",
        "ttc" => "font/collection",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/embed.rs"]
mod tests;
