use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

use anyhow::Context;

use crate::{
    foundation::core::Size,
    foundation::error::{BadgeError, BadgeResult},
    geometry::coord::Coordinate,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// An immutable badge/sticker definition.
///
/// Layers render in array order: the first layer is at the back.
pub struct Template {
    /// Stable template identifier.
    pub id: String,
    /// Human readable name, used for export filenames.
    #[serde(default)]
    pub name: String,
    /// Intrinsic canvas width in template units. Raster and PDF export require it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Intrinsic canvas height in template units. Raster and PDF export require it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Ordered layers (back to front).
    pub layers: Vec<TemplateLayer>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One layer of a template.
pub struct TemplateLayer {
    /// Identifier, unique within the template.
    pub id: String,
    /// Kind-specific defaults.
    #[serde(flatten)]
    pub content: LayerContent,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
/// Kind-specific layer defaults.
pub enum LayerContent {
    /// Pre-centered vector path.
    Shape(ShapeLayer),
    /// Single line of text.
    Text(TextLayer),
    /// Embedded foreign SVG document (icon).
    SvgImage(SvgImageLayer),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Layer kind without its data.
pub enum LayerKind {
    Shape,
    Text,
    SvgImage,
}

impl LayerContent {
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Shape(_) => LayerKind::Shape,
            Self::Text(_) => LayerKind::Text,
            Self::SvgImage(_) => LayerKind::SvgImage,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Default paint attributes of a layer.
pub struct Paint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_linejoin: Option<LineJoin>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// SVG `stroke-linejoin` values.
pub enum LineJoin {
    Miter,
    MiterClip,
    Round,
    Bevel,
    Arcs,
}

impl LineJoin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::MiterClip => "miter-clip",
            Self::Round => "round",
            Self::Bevel => "bevel",
            Self::Arcs => "arcs",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Shape layer defaults. `path` is authored centered on `(0, 0)`.
pub struct ShapeLayer {
    /// SVG path data.
    pub path: String,
    /// Center position.
    #[serde(default)]
    pub x: Coordinate,
    #[serde(default)]
    pub y: Coordinate,
    #[serde(default)]
    pub paint: Paint,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Text layer defaults.
pub struct TextLayer {
    /// Default text; an empty string when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub x: Coordinate,
    #[serde(default)]
    pub y: Coordinate,
    #[serde(default)]
    pub font: FontSpec,
    #[serde(default)]
    pub paint: Paint,
    /// Rotation in degrees around the text position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Id of a shape layer the text is clipped to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_ref: Option<String>,
    #[serde(default)]
    pub text_anchor: TextAnchor,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Font selection for a text layer.
pub struct FontSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// CSS weight keyword or number (`"bold"`, `"700"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// SVG `text-anchor`.
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Embedded SVG image defaults.
pub struct SvgImageLayer {
    /// Foreign SVG markup.
    pub svg: String,
    #[serde(default)]
    pub x: Coordinate,
    #[serde(default)]
    pub y: Coordinate,
    #[serde(default)]
    pub paint: Paint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_origin: Option<TransformOrigin>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Pivot for scale/rotation of embedded SVG content.
pub enum TransformOrigin {
    /// Center of the foreign document's own `viewBox`.
    Centroid,
    /// Explicit point in the foreign document's coordinates.
    Point { x: f64, y: f64 },
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Sparse per-layer values supplied by the UI. Unset fields fall back to the template layer.
pub struct LayerOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_linejoin: Option<LineJoin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform_origin: Option<TransformOrigin>,
    /// Replacement foreign SVG markup for `svgImage` layers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    /// Position written by layer drag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Coordinate>,
}

/// Overrides keyed by layer id.
pub type LayerOverrides = BTreeMap<String, LayerOverride>;

impl Template {
    /// Parse and validate a template from JSON.
    pub fn from_json_str(json: &str) -> BadgeResult<Self> {
        let template: Self = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    pub fn from_json_file(path: &Path) -> BadgeResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read template '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Validate template invariants.
    pub fn validate(&self) -> BadgeResult<()> {
        if self.id.trim().is_empty() {
            return Err(BadgeError::validation("template id must be non-empty"));
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if let Some(v) = value
                && (!v.is_finite() || v <= 0.0)
            {
                return Err(BadgeError::validation(format!(
                    "template {name} must be finite and > 0 when set"
                )));
            }
        }

        let mut seen = HashSet::new();
        for layer in &self.layers {
            if layer.id.trim().is_empty() {
                return Err(BadgeError::validation("layer id must be non-empty"));
            }
            if !seen.insert(layer.id.as_str()) {
                return Err(BadgeError::validation(format!(
                    "duplicate layer id '{}'",
                    layer.id
                )));
            }
        }
        Ok(())
    }

    /// Intrinsic size when both dimensions are set.
    pub fn intrinsic_size(&self) -> Option<Size> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 => {
                Some(Size::new(w, h))
            }
            _ => None,
        }
    }

    /// Intrinsic size, or [`BadgeError::MissingDimension`].
    pub fn require_intrinsic_size(&self) -> BadgeResult<Size> {
        self.intrinsic_size().ok_or_else(|| {
            BadgeError::missing_dimension(format!(
                "template '{}' has no intrinsic width/height",
                self.id
            ))
        })
    }

    /// Reference extent for percentage coordinates; missing dimensions count as `0`.
    pub fn extent(&self) -> Size {
        Size::new(self.width.unwrap_or(0.0), self.height.unwrap_or(0.0))
    }

    pub fn layer(&self, id: &str) -> Option<&TemplateLayer> {
        self.layers.iter().find(|l| l.id == id)
    }
}

/// Parse an overrides document: a JSON object keyed by layer id.
pub fn overrides_from_json_str(json: &str) -> BadgeResult<LayerOverrides> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
#[path = "../../tests/unit/template/model.rs"]
mod tests;
