use std::fmt::Write as _;

use crate::{
    foundation::core::escape_xml,
    geometry::transform::TransformList,
    resolve::layer::{ElementBody, RenderElement},
};

/// How text layers are clipped to a shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipMode {
    /// Hard-edged `<clipPath>`.
    #[default]
    ClipPath,
    /// Luminance `<mask>` filled white.
    Mask,
}

impl ClipMode {
    fn prefix(self) -> &'static str {
        match self {
            Self::ClipPath => "clip",
            Self::Mask => "mask",
        }
    }

    /// Attribute on the clipped element that references the definition.
    pub fn attr_name(self) -> &'static str {
        match self {
            Self::ClipPath => "clip-path",
            Self::Mask => "mask",
        }
    }
}

/// A text element's reference to the shape clipping it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClipRef {
    pub shape_id: String,
    pub mode: ClipMode,
}

impl ClipRef {
    pub fn new(shape_id: impl Into<String>, mode: ClipMode) -> Self {
        Self {
            shape_id: shape_id.into(),
            mode,
        }
    }

    /// Deterministic definition id, e.g. `clip-badge-bg`.
    pub fn def_id(&self) -> String {
        format!("{}-{}", self.mode.prefix(), sanitize_id(&self.shape_id))
    }

    /// `url(#...)` value for [`ClipMode::attr_name`].
    pub fn url(&self) -> String {
        format!("url(#{})", self.def_id())
    }
}

/// Replace characters that are not valid in an XML id with `_`.
pub fn sanitize_id(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if !out.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        out.insert(0, '_');
    }
    out
}

/// One `<clipPath>` or `<mask>` definition built from a shape layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipDef {
    pub id: String,
    pub mode: ClipMode,
    pub shape_id: String,
    pub path: String,
    pub transform: TransformList,
}

impl ClipDef {
    pub fn write_svg(&self, out: &mut String) {
        let tag = match self.mode {
            ClipMode::ClipPath => "clipPath",
            ClipMode::Mask => "mask",
        };
        let _ = write!(out, r#"<{tag} id="{}">"#, escape_xml(&self.id));
        let _ = write!(out, r#"<path d="{}""#, escape_xml(&self.path));
        if !self.transform.is_identity() {
            let _ = write!(out, r#" transform="{}""#, self.transform);
        }
        if self.mode == ClipMode::Mask {
            out.push_str(r#" fill="white""#);
        }
        let _ = write!(out, "/></{tag}>");
    }
}

/// Build exactly one definition per distinct clip reference found on text elements, in
/// first-reference order.
///
/// References to shapes that are not in `elements` are skipped.
pub fn build_clip_defs(elements: &[RenderElement]) -> Vec<ClipDef> {
    let mut defs: Vec<ClipDef> = Vec::new();
    for clip in elements
        .iter()
        .filter(|e| matches!(e.body, ElementBody::Text { .. }))
        .filter_map(|e| e.clip.as_ref())
    {
        let id = clip.def_id();
        if defs.iter().any(|d| d.id == id) {
            continue;
        }
        let shape = elements.iter().find_map(|e| match &e.body {
            ElementBody::Shape { path } if e.id == clip.shape_id => Some((path, &e.transform)),
            _ => None,
        });
        let Some((path, transform)) = shape else {
            tracing::debug!(shape = %clip.shape_id, "clip reference to unknown shape skipped");
            continue;
        };
        defs.push(ClipDef {
            id,
            mode: clip.mode,
            shape_id: clip.shape_id.clone(),
            path: path.clone(),
            transform: transform.clone(),
        });
    }
    defs
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/clip.rs"]
mod tests;
