use std::collections::HashSet;

use crate::{
    foundation::core::{Point, Size, pick_num},
    geometry::{
        centroid::compute_centroid,
        coord::Coordinate,
        transform::{TransformList, scale_origin_transform},
    },
    resolve::{
        clip::{ClipMode, ClipRef},
        paint::{ResolvedPaint, inject_paint},
    },
    template::model::{
        LayerContent, LayerKind, LayerOverride, LayerOverrides, ShapeLayer, SvgImageLayer,
        Template, TemplateLayer, TextAnchor, TextLayer, TransformOrigin,
    },
};

/// Options for [`resolve_layers`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResolveOptions {
    pub clip_mode: ClipMode,
}

/// A fully resolved layer, consumed identically by the preview and the export serializer.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderElement {
    pub id: String,
    pub kind: LayerKind,
    /// Resolved position in template units.
    pub position: Point,
    pub transform: TransformList,
    pub paint: ResolvedPaint,
    pub clip: Option<ClipRef>,
    pub body: ElementBody,
}

/// Kind-specific payload of a [`RenderElement`].
#[derive(Clone, Debug, PartialEq)]
pub enum ElementBody {
    Shape {
        path: String,
    },
    Text {
        content: String,
        font_family: Option<String>,
        font_size: Option<f64>,
        font_weight: Option<String>,
        anchor: TextAnchor,
    },
    SvgImage {
        /// Foreign markup with paint injected and the root tag normalized.
        markup: String,
        /// Center of the foreign `viewBox`, in the foreign document's units.
        centroid: Point,
    },
}

impl RenderElement {
    /// The `transform` attribute value; empty for the identity.
    pub fn transform_attr(&self) -> String {
        self.transform.to_string()
    }
}

/// Resolve every template layer against its override, in render order.
#[tracing::instrument(skip_all, fields(template = %template.id, layers = template.layers.len()))]
pub fn resolve_layers(
    template: &Template,
    overrides: &LayerOverrides,
    opts: &ResolveOptions,
) -> Vec<RenderElement> {
    let extent = template.extent();
    let shape_ids: HashSet<&str> = template
        .layers
        .iter()
        .filter(|l| l.content.kind() == LayerKind::Shape)
        .map(|l| l.id.as_str())
        .collect();

    template
        .layers
        .iter()
        .map(|layer| resolve_layer(layer, overrides.get(&layer.id), extent, &shape_ids, opts))
        .collect()
}

/// Resolve one layer. `shape_ids` lists the shape layers a text clip may reference.
pub fn resolve_layer(
    layer: &TemplateLayer,
    ov: Option<&LayerOverride>,
    extent: Size,
    shape_ids: &HashSet<&str>,
    opts: &ResolveOptions,
) -> RenderElement {
    match &layer.content {
        LayerContent::Shape(shape) => resolve_shape(&layer.id, shape, ov, extent),
        LayerContent::Text(text) => resolve_text(&layer.id, text, ov, extent, shape_ids, opts),
        LayerContent::SvgImage(image) => resolve_svg_image(&layer.id, image, ov, extent),
    }
}

fn position(x: Coordinate, y: Coordinate, ov: Option<&LayerOverride>, extent: Size) -> Point {
    let x = ov.and_then(|o| o.x).unwrap_or(x);
    let y = ov.and_then(|o| o.y).unwrap_or(y);
    Point::new(x.resolve(extent.width, 0.0), y.resolve(extent.height, 0.0))
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|n| n.is_finite())
}

fn resolve_shape(
    id: &str,
    shape: &ShapeLayer,
    ov: Option<&LayerOverride>,
    extent: Size,
) -> RenderElement {
    let position = position(shape.x, shape.y, ov, extent);
    RenderElement {
        id: id.to_string(),
        kind: LayerKind::Shape,
        position,
        transform: TransformList::new().translate(position.x, position.y),
        paint: ResolvedPaint::merge(&shape.paint, ov),
        clip: None,
        body: ElementBody::Shape {
            path: shape.path.clone(),
        },
    }
}

fn resolve_text(
    id: &str,
    text: &TextLayer,
    ov: Option<&LayerOverride>,
    extent: Size,
    shape_ids: &HashSet<&str>,
    opts: &ResolveOptions,
) -> RenderElement {
    let position = position(text.x, text.y, ov, extent);
    let rotation = pick_num(ov.and_then(|o| o.rotation), text.rotation.unwrap_or(0.0));

    let clip = match text.clip_ref.as_deref() {
        Some(shape_id) if shape_ids.contains(shape_id) => {
            Some(ClipRef::new(shape_id, opts.clip_mode))
        }
        Some(shape_id) => {
            tracing::debug!(layer = id, shape = shape_id, "clipRef names no shape layer");
            None
        }
        None => None,
    };

    RenderElement {
        id: id.to_string(),
        kind: LayerKind::Text,
        position,
        transform: TransformList::new().rotate_about(rotation, position),
        paint: ResolvedPaint::merge(&text.paint, ov),
        clip,
        body: ElementBody::Text {
            content: ov
                .and_then(|o| o.text.clone())
                .or_else(|| text.text.clone())
                .unwrap_or_default(),
            font_family: ov
                .and_then(|o| o.font_family.clone())
                .or_else(|| text.font.family.clone()),
            font_size: finite(ov.and_then(|o| o.font_size)).or_else(|| finite(text.font.size)),
            font_weight: ov
                .and_then(|o| o.font_weight.clone())
                .or_else(|| text.font.weight.clone()),
            anchor: text.text_anchor,
        },
    }
}

fn resolve_svg_image(
    id: &str,
    image: &SvgImageLayer,
    ov: Option<&LayerOverride>,
    extent: Size,
) -> RenderElement {
    let position = position(image.x, image.y, ov, extent);
    let source = ov.and_then(|o| o.svg.as_deref()).unwrap_or(&image.svg);
    let centroid = compute_centroid(source);

    let scale = finite(ov.and_then(|o| o.scale)).or_else(|| finite(image.scale));
    let rotation = finite(ov.and_then(|o| o.rotation)).or_else(|| finite(image.rotation));
    let origin = ov
        .and_then(|o| o.transform_origin)
        .or(image.transform_origin);

    let mut transform = TransformList::new().translate(position.x, position.y);
    match (scale, origin) {
        (Some(scale), Some(origin)) => {
            let pivot = match origin {
                TransformOrigin::Centroid => centroid,
                TransformOrigin::Point { x, y } => Point::new(x, y),
            };
            transform = transform.then(scale_origin_transform(
                pivot,
                scale,
                rotation.unwrap_or(0.0),
            ));
        }
        _ => {
            if let Some(rotation) = rotation {
                transform = transform.rotate(rotation);
            }
        }
    }

    let paint = ResolvedPaint::merge(&image.paint, ov);
    RenderElement {
        id: id.to_string(),
        kind: LayerKind::SvgImage,
        position,
        transform,
        body: ElementBody::SvgImage {
            markup: inject_paint(source, &paint),
            centroid,
        },
        paint,
        clip: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/layer.rs"]
mod tests;
