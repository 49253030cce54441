use std::{borrow::Cow, fmt::Write as _, sync::LazyLock};

use regex::{Captures, Regex};

use crate::{
    foundation::core::{Rect, escape_xml, fmt_num},
    geometry::centroid::{find_svg_open_tag, parse_view_box},
    template::model::{LayerOverride, LineJoin, Paint},
};

/// Paint after merging a layer's override over its template defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedPaint {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub stroke_linejoin: Option<LineJoin>,
}

impl ResolvedPaint {
    /// Field-by-field `override.or(default)`. Non-finite stroke widths are ignored.
    pub fn merge(defaults: &Paint, ov: Option<&LayerOverride>) -> Self {
        let finite = |v: Option<f64>| v.filter(|w| w.is_finite());
        Self {
            fill: ov.and_then(|o| o.fill.clone()).or_else(|| defaults.fill.clone()),
            stroke: ov
                .and_then(|o| o.stroke.clone())
                .or_else(|| defaults.stroke.clone()),
            stroke_width: finite(ov.and_then(|o| o.stroke_width))
                .or_else(|| finite(defaults.stroke_width)),
            stroke_linejoin: ov
                .and_then(|o| o.stroke_linejoin)
                .or(defaults.stroke_linejoin),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fill.is_none()
            && self.stroke.is_none()
            && self.stroke_width.is_none()
            && self.stroke_linejoin.is_none()
    }

    /// Append ` fill="..."` style attributes for every set field.
    pub fn write_attrs(&self, out: &mut String) {
        if let Some(fill) = &self.fill {
            let _ = write!(out, r#" fill="{}""#, escape_xml(fill));
        }
        if let Some(stroke) = &self.stroke {
            let _ = write!(out, r#" stroke="{}""#, escape_xml(stroke));
        }
        if let Some(w) = self.stroke_width {
            let _ = write!(out, r#" stroke-width="{}""#, fmt_num(w));
        }
        if let Some(join) = self.stroke_linejoin {
            let _ = write!(out, r#" stroke-linejoin="{}""#, join.as_str());
        }
    }
}

static FILL_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\s)fill\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("fill attribute regex")
});
static STROKE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\s)stroke\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("stroke attribute regex")
});
static FILL_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([;{"'\s])fill\s*:\s*([^;"'}]+)"#).expect("fill declaration regex")
});
static STROKE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([;{"'\s])stroke\s*:\s*([^;"'}]+)"#).expect("stroke declaration regex")
});
static CURRENT_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcurrentColor\b").expect("currentColor regex"));
static ANY_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s+([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"[^"]*"|'[^']*')"#)
        .expect("attribute regex")
});

/// Paint values that recoloring leaves alone.
fn is_preserved(value: &str) -> bool {
    let v = value.trim();
    v.eq_ignore_ascii_case("none") || v.eq_ignore_ascii_case("transparent") || v.starts_with("url(")
}

fn attr_value<'h>(caps: &Captures<'h>) -> &'h str {
    caps.get(2)
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
        .unwrap_or("")
}

fn recolor_attrs<'a>(re: &Regex, input: &'a str, name: &str, color: &str) -> Cow<'a, str> {
    re.replace_all(input, |caps: &Captures<'_>| {
        if is_preserved(attr_value(caps)) {
            caps[0].to_string()
        } else {
            format!(r#"{}{name}="{}""#, &caps[1], escape_xml(color))
        }
    })
}

fn recolor_decls<'a>(re: &Regex, input: &'a str, name: &str, color: &str) -> Cow<'a, str> {
    re.replace_all(input, |caps: &Captures<'_>| {
        if is_preserved(&caps[2]) {
            caps[0].to_string()
        } else {
            format!("{}{name}:{}", &caps[1], escape_xml(color))
        }
    })
}

fn recolor_body(body: &str, paint: &ResolvedPaint) -> String {
    let mut out = Cow::Borrowed(body);
    if let Some(color) = paint.fill.as_deref().or(paint.stroke.as_deref()) {
        let escaped = escape_xml(color).into_owned();
        out = Cow::Owned(
            CURRENT_COLOR
                .replace_all(&out, regex::NoExpand(&escaped))
                .into_owned(),
        );
    }
    if let Some(fill) = &paint.fill {
        out = Cow::Owned(recolor_attrs(&FILL_ATTR, &out, "fill", fill).into_owned());
        out = Cow::Owned(recolor_decls(&FILL_DECL, &out, "fill", fill).into_owned());
    }
    if let Some(stroke) = &paint.stroke {
        out = Cow::Owned(recolor_attrs(&STROKE_ATTR, &out, "stroke", stroke).into_owned());
        out = Cow::Owned(recolor_decls(&STROKE_DECL, &out, "stroke", stroke).into_owned());
    }
    out.into_owned()
}

/// Rewrite the root `<svg ...>` tag so the nested document maps its own coordinates 1:1 onto
/// the enclosing group and inherits the resolved paint.
fn rewrite_root_tag(tag: &str, view_box: Option<Rect>, paint: &ResolvedPaint) -> String {
    let inner = tag.trim_start_matches("<svg");
    let (inner, close) = match inner.strip_suffix("/>") {
        Some(rest) => (rest, "/>"),
        None => (inner.strip_suffix('>').unwrap_or(inner), ">"),
    };

    let replaced = |name: &str| match name {
        "x" | "y" | "width" | "height" | "overflow" => view_box.is_some(),
        "fill" => paint.fill.is_some(),
        "stroke" => paint.stroke.is_some(),
        "stroke-width" => paint.stroke_width.is_some(),
        "stroke-linejoin" => paint.stroke_linejoin.is_some(),
        _ => false,
    };
    let kept = ANY_ATTR.replace_all(inner, |caps: &Captures<'_>| {
        if replaced(&caps[1]) {
            String::new()
        } else {
            caps[0].to_string()
        }
    });

    // A root `style` attribute would win over the presentation attributes appended below.
    let kept = recolor_body(&kept, paint);

    let mut out = String::with_capacity(tag.len() + 96);
    out.push_str("<svg");
    out.push_str(kept.trim_end());
    if let Some(vb) = view_box {
        let _ = write!(
            out,
            r#" x="{}" y="{}" width="{}" height="{}" overflow="visible""#,
            fmt_num(vb.x0),
            fmt_num(vb.y0),
            fmt_num(vb.width()),
            fmt_num(vb.height())
        );
    }
    paint.write_attrs(&mut out);
    out.push_str(close);
    out
}

/// Inject resolved paint into foreign SVG markup by string substitution.
///
/// Everything before the root `<svg>` tag (XML prolog, doctype, comments) is dropped since the
/// result is nested inside another document. Markup without an `<svg>` tag passes through
/// unchanged.
pub fn inject_paint(markup: &str, paint: &ResolvedPaint) -> String {
    let Some(tag) = find_svg_open_tag(markup) else {
        tracing::debug!(
            len = markup.len(),
            "foreign svg has no <svg> root tag, passing through unmodified"
        );
        return markup.to_string();
    };
    let root = rewrite_root_tag(tag.as_str(), parse_view_box(markup), paint);
    let body = recolor_body(&markup[tag.end()..], paint);
    format!("{root}{body}")
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/paint.rs"]
mod tests;
