//! badgekit renders parametric badge/sticker templates and exports them.
//!
//! A [`Template`] is an ordered list of shape, text, and embedded-SVG layers. The UI edits a
//! sparse [`LayerOverrides`] map; everything downstream is recomputed from the pair by pure
//! functions.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `Template + LayerOverrides -> Vec<RenderElement>` ([`resolve_layers`]), with
//!    clip definitions built from the shapes text layers reference ([`build_clip_defs`]).
//! 2. **Assemble**: elements and definitions form a [`RenderTree`] ([`build_render_tree`]).
//! 3. **Preview**: a [`ViewportController`] owns the visible [`ViewBox`] for a container of known
//!    pixel size and turns wheel, pinch, and gesture input into zoom and pan.
//! 4. **Export**: the [`Exporter`] serializes the tree at intrinsic size, inlines catalog fonts
//!    ([`FontEmbedder`]), and converts to SVG, PNG, WebP, or raster-in-PDF ([`ExportArtifact`]).
//!
//! Zoom is always derived (`container_width / view_box.width`), never stored, so zoom and pan
//! cannot drift apart.
#![forbid(unsafe_code)]

mod export;
mod fonts;
mod foundation;
mod geometry;
mod resolve;
mod scene;
mod template;
mod ui;
mod viewport;

pub use export::inspect::{detect_font_families, inject_style};
pub use export::naming::{suggested_filename, suggested_filename_at};
pub use export::pdf::{px_to_mm, px_to_pt, raster_pdf};
pub use export::pipeline::{
    ExportArtifact, ExportFormat, Exporter, PreparedDocument, RasterScale,
};
pub use export::raster::{encode_image, raster_dims, rasterize_svg};
pub use fonts::catalog::{FontCatalog, FontEntry, normalize_family};
pub use fonts::embed::{EmbedOutcome, EmbeddedFont, FontEmbedder, data_uri, sniff_font_mime};
pub use fonts::fetch::{FontFetcher, HttpFontFetcher};
pub use foundation::config::{BadgeConfig, ExportPolicy, FontPolicy, ViewportPolicy};
pub use foundation::core::{Affine, Point, Rect, Size, Vec2, ViewBox, escape_xml, fmt_num};
pub use foundation::error::{BadgeError, BadgeResult};
pub use geometry::centroid::{compute_centroid, parse_view_box};
pub use geometry::coord::{Coordinate, resolve_coordinate};
pub use geometry::fit::{ScaleBounds, fit_scale};
pub use geometry::transform::{TransformList, TransformOp, scale_origin_transform};
pub use resolve::clip::{ClipDef, ClipMode, ClipRef, build_clip_defs, sanitize_id};
pub use resolve::layer::{
    ElementBody, RenderElement, ResolveOptions, resolve_layer, resolve_layers,
};
pub use resolve::paint::{ResolvedPaint, inject_paint};
pub use scene::tree::{RenderTree, build_render_tree};
pub use template::model::{
    FontSpec, LayerContent, LayerKind, LayerOverride, LayerOverrides, LineJoin, Paint,
    ShapeLayer, SvgImageLayer, Template, TemplateLayer, TextAnchor, TextLayer, TransformOrigin,
    overrides_from_json_str,
};
pub use ui::expansion::ExpansionState;
pub use viewport::controller::ViewportController;
pub use viewport::drag::LayerDrag;
pub use viewport::input::{DeltaMode, WheelInput};
