use std::fmt::Write as _;

use crate::{
    foundation::core::{Size, ViewBox, escape_xml, fmt_num},
    resolve::{
        clip::{ClipDef, build_clip_defs},
        layer::{ElementBody, RenderElement, ResolveOptions, resolve_layers},
    },
    template::model::{LayerOverrides, Template},
};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Resolved elements plus the definitions they reference, ready to serialize.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderTree {
    /// `None` for templates without both dimensions: the document is then written without a
    /// `viewBox` and renders in plain user units.
    pub view_box: Option<ViewBox>,
    /// Intrinsic size, when the template declares both dimensions.
    pub size: Option<Size>,
    pub defs: Vec<ClipDef>,
    pub elements: Vec<RenderElement>,
}

/// Resolve `template` with `overrides` into a tree whose viewBox is the intrinsic canvas, when
/// the template has one.
pub fn build_render_tree(
    template: &Template,
    overrides: &LayerOverrides,
    opts: &ResolveOptions,
) -> RenderTree {
    let elements = resolve_layers(template, overrides, opts);
    let defs = build_clip_defs(&elements);
    let size = template.intrinsic_size();
    RenderTree {
        view_box: size.map(|s| ViewBox::from_size(s.width, s.height)),
        size,
        defs,
        elements,
    }
}

impl RenderTree {
    /// Same content seen through another window, e.g. the preview viewport.
    pub fn with_view_box(mut self, view_box: ViewBox) -> Self {
        self.view_box = Some(view_box);
        self
    }

    /// Standalone document: XML declaration, intrinsic `width`/`height`, and an optional
    /// `<style>` block as the root's first child.
    pub fn to_svg_markup(&self, style: Option<&str>) -> String {
        let mut out = String::with_capacity(256 + self.elements.len() * 128);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        self.open_root(&mut out, self.size.map(|s| (fmt_num(s.width), fmt_num(s.height))));
        if let Some(css) = style.filter(|s| !s.trim().is_empty()) {
            write_style(&mut out, css);
        }
        self.write_body(&mut out);
        out.push_str("</svg>\n");
        out
    }

    /// Inline document that fills its container, for the live preview.
    pub fn to_preview_markup(&self) -> String {
        let mut out = String::with_capacity(256 + self.elements.len() * 128);
        self.open_root(&mut out, Some(("100%".to_string(), "100%".to_string())));
        self.write_body(&mut out);
        out.push_str("</svg>");
        out
    }

    fn open_root(&self, out: &mut String, size: Option<(String, String)>) {
        let _ = write!(out, r#"<svg xmlns="{SVG_NS}" xmlns:xlink="{XLINK_NS}""#);
        if let Some(vb) = self.view_box.filter(ViewBox::is_valid) {
            let _ = write!(out, r#" viewBox="{}""#, vb.to_attr());
        }
        if let Some((w, h)) = size {
            let _ = write!(out, r#" width="{w}" height="{h}""#);
        }
        out.push_str(r#" preserveAspectRatio="xMidYMid meet">"#);
    }

    fn write_body(&self, out: &mut String) {
        if !self.defs.is_empty() {
            out.push_str("<defs>");
            for def in &self.defs {
                def.write_svg(out);
            }
            out.push_str("</defs>");
        }
        for element in &self.elements {
            write_element(out, element);
        }
    }
}

pub(crate) fn write_style(out: &mut String, css: &str) {
    let _ = write!(out, "<style>{}</style>", escape_xml(css));
}

fn write_element(out: &mut String, el: &RenderElement) {
    let layer_id = escape_xml(&el.id);
    let transform = el.transform_attr();
    match &el.body {
        ElementBody::Shape { path } => {
            let _ = write!(
                out,
                r#"<path data-layer-id="{layer_id}" d="{}""#,
                escape_xml(path)
            );
            if !transform.is_empty() {
                let _ = write!(out, r#" transform="{transform}""#);
            }
            el.paint.write_attrs(out);
            out.push_str("/>");
        }
        ElementBody::Text {
            content,
            font_family,
            font_size,
            font_weight,
            anchor,
        } => {
            // Clip coordinates follow the referencing element's transform, so a rotated text
            // takes its clip from an untransformed wrapper group.
            let wrap_clip = el.clip.as_ref().filter(|_| !transform.is_empty());
            if let Some(clip) = wrap_clip {
                let _ = write!(out, r#"<g {}="{}">"#, clip.mode.attr_name(), clip.url());
            }
            let _ = write!(
                out,
                r#"<text data-layer-id="{layer_id}" x="{}" y="{}""#,
                fmt_num(el.position.x),
                fmt_num(el.position.y)
            );
            if !transform.is_empty() {
                let _ = write!(out, r#" transform="{transform}""#);
            }
            if let Some(family) = font_family {
                let _ = write!(out, r#" font-family="{}""#, escape_xml(family));
            }
            if let Some(size) = font_size {
                let _ = write!(out, r#" font-size="{}""#, fmt_num(*size));
            }
            if let Some(weight) = font_weight {
                let _ = write!(out, r#" font-weight="{}""#, escape_xml(weight));
            }
            let _ = write!(
                out,
                r#" text-anchor="{}" dominant-baseline="central""#,
                anchor.as_str()
            );
            el.paint.write_attrs(out);
            if wrap_clip.is_none()
                && let Some(clip) = &el.clip
            {
                let _ = write!(out, r#" {}="{}""#, clip.mode.attr_name(), clip.url());
            }
            let _ = write!(out, ">{}</text>", escape_xml(content));
            if wrap_clip.is_some() {
                out.push_str("</g>");
            }
        }
        ElementBody::SvgImage { markup, .. } => {
            let _ = write!(out, r#"<g data-layer-id="{layer_id}""#);
            if !transform.is_empty() {
                let _ = write!(out, r#" transform="{transform}""#);
            }
            out.push('>');
            out.push_str(markup);
            out.push_str("</g>");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tree.rs"]
mod tests;
