use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::{
    fonts::embed::EmbeddedFont,
    foundation::{
        core::{Size, escape_xml},
        error::{BadgeError, BadgeResult},
    },
    geometry::centroid::find_svg_open_tag,
};

/// Pixel dimensions for `size` at `scale`, refusing empty or oversized rasters.
pub fn raster_dims(size: Size, scale: f64, max_dim: u32) -> BadgeResult<(u32, u32)> {
    let to_px = |v: f64| -> BadgeResult<u32> {
        let px = (v * scale).round();
        if !px.is_finite() || px < 1.0 {
            return Err(BadgeError::render(format!(
                "raster size must be at least 1px, got {v} x {scale}"
            )));
        }
        Ok(px as u32)
    };
    let (w, h) = (to_px(size.width)?, to_px(size.height)?);
    if w > max_dim || h > max_dim {
        return Err(BadgeError::render(format!(
            "raster size too large: {w}x{h} (max {max_dim}x{max_dim})"
        )));
    }
    Ok((w, h))
}

/// Font database for export rasterization: system fonts plus the embedded binaries.
fn build_export_fontdb(fonts: &[EmbeddedFont]) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    for font in fonts.iter().filter(|f| f.is_loadable()) {
        db.load_font_data(font.data.as_ref().clone());
    }
    tracing::debug!(faces = db.len(), "export font database ready");
    Arc::new(db)
}

fn font_stretch(stretch: usvg::FontStretch) -> usvg::fontdb::Stretch {
    use usvg::{FontStretch, fontdb::Stretch};

    match stretch {
        FontStretch::UltraCondensed => Stretch::UltraCondensed,
        FontStretch::ExtraCondensed => Stretch::ExtraCondensed,
        FontStretch::Condensed => Stretch::Condensed,
        FontStretch::SemiCondensed => Stretch::SemiCondensed,
        FontStretch::Normal => Stretch::Normal,
        FontStretch::SemiExpanded => Stretch::SemiExpanded,
        FontStretch::Expanded => Stretch::Expanded,
        FontStretch::ExtraExpanded => Stretch::ExtraExpanded,
        FontStretch::UltraExpanded => Stretch::UltraExpanded,
    }
}

fn make_export_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<usvg::fontdb::Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                })
                .collect();
            families.push(usvg::fontdb::Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };
            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: font_stretch(font.stretch()),
                style,
            };

            // Last resort: the first face in the database.
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

/// Insert a full-canvas rectangle behind all content.
fn with_background(svg: &str, color: &str) -> String {
    let Some(root) = find_svg_open_tag(svg) else {
        return svg.to_string();
    };
    format!(
        r#"{}<rect width="100%" height="100%" fill="{}"/>{}"#,
        &svg[..root.end()],
        escape_xml(color),
        &svg[root.end()..]
    )
}

/// Rasterize a standalone SVG document to a straight-alpha RGBA image of `width x height`.
#[tracing::instrument(skip(svg, fonts), fields(svg_len = svg.len(), fonts = fonts.len()))]
pub fn rasterize_svg(
    svg: &str,
    width: u32,
    height: u32,
    fonts: &[EmbeddedFont],
    background: Option<&str>,
) -> BadgeResult<image::RgbaImage> {
    let svg = match background {
        Some(color) => with_background(svg, color),
        None => svg.to_string(),
    };

    let opts = usvg::Options {
        fontdb: build_export_fontdb(fonts),
        font_resolver: make_export_font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse export svg")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| BadgeError::render("failed to allocate export pixmap"))?;
    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    let mut rgba = pixmap.take();
    demultiply_rgba8_in_place(&mut rgba);
    image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| BadgeError::render("pixmap size does not match raster dimensions"))
}

/// Encode `img` with the given `image` format into memory.
pub fn encode_image(img: &image::RgbaImage, format: image::ImageFormat) -> BadgeResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format)
        .with_context(|| format!("encode {format:?}"))?;
    Ok(buf)
}

fn demultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/raster.rs"]
mod tests;
