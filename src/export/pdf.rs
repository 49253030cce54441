use std::io::Write;

use anyhow::Context;
use flate2::{Compression, write::ZlibEncoder};
use lopdf::{
    Document, Object, Stream, StringFormat,
    content::{Content, Operation},
    dictionary,
};

use crate::foundation::error::BadgeResult;

/// CSS reference pixels per inch.
pub const CSS_PX_PER_INCH: f64 = 96.0;
pub const PT_PER_INCH: f64 = 72.0;
pub const MM_PER_INCH: f64 = 25.4;

/// Physical page size in millimetres for a raster of `px` CSS pixels.
pub fn px_to_mm(px: f64) -> f64 {
    px * MM_PER_INCH / CSS_PX_PER_INCH
}

pub fn px_to_pt(px: f64) -> f64 {
    px * PT_PER_INCH / CSS_PX_PER_INCH
}

/// PDF text string: plain literal for ASCII, UTF-16BE with a byte order mark otherwise.
fn pdf_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&[0xFE, 0xFF]);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn deflate(bytes: &[u8]) -> BadgeResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).context("deflate pdf stream")?;
    Ok(encoder.finish().context("finish pdf stream")?)
}

/// One-page PDF holding `img` scaled to fill a page of `px_to_mm(width) x px_to_mm(height)`.
///
/// Color goes into a DeviceRGB image XObject and alpha into its soft mask.
#[tracing::instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn raster_pdf(img: &image::RgbaImage, title: &str) -> BadgeResult<Vec<u8>> {
    let (w, h) = img.dimensions();
    let mut rgb = Vec::with_capacity((w * h * 3) as usize);
    let mut alpha = Vec::with_capacity((w * h) as usize);
    for px in img.pixels() {
        rgb.extend_from_slice(&px.0[..3]);
        alpha.push(px.0[3]);
    }

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let smask_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => w as i64,
            "Height" => h as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        deflate(&alpha)?,
    ));
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => w as i64,
            "Height" => h as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "SMask" => smask_id,
            "Filter" => "FlateDecode",
        },
        deflate(&rgb)?,
    ));

    let page_w = px_to_pt(w as f64) as f32;
    let page_h = px_to_pt(h as f64) as f32;
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    page_w.into(),
                    0.into(),
                    0.into(),
                    page_h.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec!["Im1".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_bytes = content.encode().context("encode pdf page content")?;
    let content_id = doc.add_object(Stream::new(
        dictionary! { "Filter" => "FlateDecode" },
        deflate(&content_bytes)?,
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), page_w.into(), page_h.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im1" => image_id },
        },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);
    let info_id = doc.add_object(dictionary! {
        "Title" => pdf_text_string(title),
        "Producer" => Object::string_literal(concat!("badgekit ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Info", info_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).context("write pdf")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/export/pdf.rs"]
mod tests;
