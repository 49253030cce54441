use super::*;

#[test]
fn unit_conversions_match_css_reference_pixel() {
    assert!((px_to_mm(200.0) - 52.916_666).abs() < 1e-5);
    assert!((px_to_mm(60.0) - 15.875).abs() < 1e-9);
    assert_eq!(px_to_pt(200.0), 150.0);
}

#[test]
fn single_page_sized_to_the_raster() {
    let img = image::RgbaImage::from_pixel(200, 60, image::Rgba([10, 20, 30, 200]));
    let bytes = raster_pdf(&img, "Round Badge").unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);
    let page_id = *pages.values().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    let media_box: Vec<f32> = page
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o.as_float().unwrap())
        .collect();
    assert_eq!(media_box, vec![0.0, 0.0, 150.0, 45.0]);

    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let image_id = xobjects.get(b"Im1").unwrap().as_reference().unwrap();
    let image = doc.get_object(image_id).unwrap().as_stream().unwrap();
    assert_eq!(image.dict.get(b"Width").unwrap().as_i64().unwrap(), 200);
    assert!(image.dict.get(b"SMask").is_ok());
}

fn info_title(bytes: &[u8]) -> Vec<u8> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_dictionary(info_id).unwrap();
    info.get(b"Title").unwrap().as_str().unwrap().to_vec()
}

#[test]
fn non_ascii_title_is_utf16_with_bom() {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
    let title = info_title(&raster_pdf(&img, "Café ★").unwrap());
    assert_eq!(&title[..2], &[0xFE, 0xFF]);
    let units: Vec<u16> = title[2..]
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect();
    assert_eq!(String::from_utf16(&units).unwrap(), "Café ★");

    let ascii = info_title(&raster_pdf(&img, "Round Badge").unwrap());
    assert_eq!(ascii, b"Round Badge");
}
