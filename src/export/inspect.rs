use std::{ops::Range, sync::LazyLock};

use regex::Regex;

use crate::{
    fonts::catalog::normalize_family, foundation::core::escape_xml,
    geometry::centroid::find_svg_open_tag,
};

static TEXT_FONT_FAMILY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(?:text|tspan)\b[^>]*?\sfont-family\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("static font-family regex")
});

static STYLE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<style\b[^>]*?(?:/>|>.*?</style\s*>)").expect("static style element regex")
});

static NESTED_SVG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<svg\b").expect("static nested svg regex"));

/// Distinct `font-family` values used by `<text>`/`<tspan>` elements, in document order.
///
/// The document is parsed with `roxmltree`; if it does not parse, a regex scan is used instead.
pub fn detect_font_families(svg: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |raw: &str| {
        let family = normalize_family(raw);
        if !family.is_empty() && !out.iter().any(|f| f.eq_ignore_ascii_case(&family)) {
            out.push(family);
        }
    };

    match roxmltree::Document::parse(svg) {
        Ok(doc) => {
            for node in doc
                .descendants()
                .filter(|n| matches!(n.tag_name().name(), "text" | "tspan"))
            {
                if let Some(family) = node.attribute("font-family") {
                    push(family);
                }
                if let Some(family) = node.attribute("style").and_then(style_font_family) {
                    push(family);
                }
            }
        }
        Err(err) => {
            tracing::debug!(error = %err, "export svg did not parse, scanning font families by regex");
            for caps in TEXT_FONT_FAMILY.captures_iter(svg) {
                if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
                    push(m.as_str());
                }
            }
        }
    }
    out
}

fn style_font_family(style: &str) -> Option<&str> {
    style.split(';').find_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        (name.trim() == "font-family").then_some(value.trim())
    })
}

/// Byte ranges of the `<style>` elements that belong to the outer document. Styles inside a
/// nested `<svg>` (embedded icons) are not included.
fn document_style_ranges(svg: &str) -> Vec<Range<usize>> {
    match roxmltree::Document::parse(svg) {
        Ok(doc) => {
            let root = doc.root_element();
            doc.descendants()
                .filter(|n| n.has_tag_name("style"))
                .filter(|n| {
                    !n.ancestors()
                        .skip(1)
                        .any(|a| a != root && a.is_element() && a.tag_name().name() == "svg")
                })
                .map(|n| n.range())
                .collect()
        }
        Err(err) => {
            tracing::debug!(error = %err, "export svg did not parse, locating styles by regex");
            let Some(root) = find_svg_open_tag(svg) else {
                return Vec::new();
            };
            let outer_end = NESTED_SVG
                .find(&svg[root.end()..])
                .map_or(svg.len(), |m| root.end() + m.start());
            STYLE_ELEMENT
                .find_iter(&svg[..outer_end])
                .map(|m| m.range())
                .collect()
        }
    }
}

/// Remove the document's own `<style>` elements and insert one holding `css` as the root's first
/// child. Styles of nested `<svg>` documents are kept.
///
/// Markup without an `<svg>` root is returned unchanged.
pub fn inject_style(svg: &str, css: &str) -> String {
    let mut stripped = String::with_capacity(svg.len());
    let mut cursor = 0;
    for range in document_style_ranges(svg) {
        stripped.push_str(&svg[cursor..range.start]);
        cursor = range.end;
    }
    stripped.push_str(&svg[cursor..]);

    let Some(root) = find_svg_open_tag(&stripped) else {
        return stripped;
    };
    if root.as_str().ends_with("/>") {
        return stripped;
    }
    let mut out = String::with_capacity(stripped.len() + css.len() + 16);
    out.push_str(&stripped[..root.end()]);
    out.push_str("<style>");
    out.push_str(&escape_xml(css));
    out.push_str("</style>");
    out.push_str(&stripped[root.end()..]);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/export/inspect.rs"]
mod tests;
