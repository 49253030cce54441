use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::core::{Point, Rect};

static SVG_OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<svg\b[^>]*>").expect("static svg tag regex")
});

static VIEW_BOX_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bviewBox\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("static viewBox regex")
});

/// Locate the first opening `<svg ...>` tag without parsing the document.
pub(crate) fn find_svg_open_tag(markup: &str) -> Option<regex::Match<'_>> {
    SVG_OPEN_TAG.find(markup)
}

/// Read the root `viewBox` of a foreign SVG as a rectangle.
///
/// Returns `None` when there is no `<svg>` tag, no `viewBox`, or the value is not four finite
/// numbers with a non-negative extent.
pub fn parse_view_box(svg_source: &str) -> Option<Rect> {
    let tag = find_svg_open_tag(svg_source)?;
    let caps = VIEW_BOX_ATTR.captures(tag.as_str())?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();

    let mut nums = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok().filter(|v| v.is_finite()));

    let x = nums.next()??;
    let y = nums.next()??;
    let w = nums.next()??;
    let h = nums.next()??;
    if nums.next().is_some() || w < 0.0 || h < 0.0 {
        return None;
    }
    Some(Rect::new(x, y, x + w, y + h))
}

/// Visual center of a foreign SVG, taken from its own `viewBox`; `(0, 0)` when absent.
pub fn compute_centroid(svg_source: &str) -> Point {
    parse_view_box(svg_source)
        .map(|r| r.center())
        .unwrap_or(Point::ORIGIN)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/centroid.rs"]
mod tests;
