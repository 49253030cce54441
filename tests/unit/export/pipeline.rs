use std::collections::HashMap;

use super::*;
use crate::fonts::catalog::FontEntry;

struct StaticFetcher(HashMap<&'static str, &'static [u8]>);

impl FontFetcher for StaticFetcher {
    fn fetch_text(&self, url: &str) -> BadgeResult<String> {
        self.fetch_bytes(url)
            .map(|b| String::from_utf8_lossy(&b).into_owned())
    }

    fn fetch_bytes(&self, url: &str) -> BadgeResult<Vec<u8>> {
        self.0
            .get(url)
            .map(|b| b.to_vec())
            .ok_or_else(|| BadgeError::font_fetch(format!("no route to {url}")))
    }
}

const TEMPLATE: &str = r#"{
    "id": "hello", "name": "Hello Badge", "width": 200, "height": 60,
    "layers": [
        { "id": "title", "kind": "text", "text": "Hello", "x": "50%", "y": "50%",
          "font": { "family": "Brand Sans", "size": 18 } }
    ]
}"#;

fn config() -> BadgeConfig {
    let mut config = BadgeConfig::default();
    config.fonts.extra_catalog = vec![FontEntry::new("Brand Sans", "https://fonts.test/brand.css")];
    config
}

fn exporter() -> Exporter {
    let mut routes: HashMap<&'static str, &'static [u8]> = HashMap::new();
    routes.insert(
        "https://fonts.test/brand.css",
        b"@font-face{font-family:'Brand Sans';src:url(/brand.ttf)}",
    );
    routes.insert("https://fonts.test/brand.ttf", &[0, 1, 0, 0, 0, 0]);
    Exporter::with_fetcher(&config(), Arc::new(StaticFetcher(routes)))
}

#[test]
fn svg_export_embeds_catalog_fonts() {
    let t = Template::from_json_str(TEMPLATE).unwrap();
    let artifact = exporter()
        .export(&t, &LayerOverrides::new(), ExportFormat::Svg, RasterScale::X1)
        .unwrap();
    let svg = String::from_utf8(artifact.bytes.clone()).unwrap();

    assert!(svg.contains("<style>@font-face{font-family:&apos;Brand Sans&apos;;src:url(data:font/ttf;base64,AAEAAAAA)}"), "{svg}");
    assert_eq!(artifact.mime, "image/svg+xml");
    assert!(artifact.filename.starts_with("hello-badge-"));
    assert!(artifact.filename.ends_with(".svg"));
    assert!(artifact.failed_fonts.is_empty());
    assert!(artifact.to_data_uri().starts_with("data:image/svg+xml;base64,"));
}

#[test]
fn disabled_embedding_skips_style() {
    let mut config = config();
    config.export.embed_fonts = false;
    let exporter = Exporter::with_fetcher(&config, Arc::new(StaticFetcher(HashMap::new())));
    let t = Template::from_json_str(TEMPLATE).unwrap();
    let svg = exporter.export_svg_markup(&t, &LayerOverrides::new());
    assert!(!svg.contains("<style>"));
}

#[test]
fn unreachable_fonts_keep_the_import() {
    let exporter = Exporter::with_fetcher(&config(), Arc::new(StaticFetcher(HashMap::new())));
    let t = Template::from_json_str(TEMPLATE).unwrap();
    let doc = exporter.prepare(&t, &LayerOverrides::new());
    assert!(doc.svg.contains("@import url(&apos;https://fonts.test/brand.css&apos;);"));
    assert_eq!(doc.failed_fonts, vec!["https://fonts.test/brand.css".to_string()]);
}

#[test]
fn raster_formats_require_intrinsic_dimensions() {
    let t = Template::from_json_str(r#"{ "id": "t", "width": 10, "layers": [] }"#).unwrap();
    let exporter = exporter();
    for format in [ExportFormat::Png, ExportFormat::Webp, ExportFormat::Pdf] {
        let err = exporter
            .export(&t, &LayerOverrides::new(), format, RasterScale::X2)
            .unwrap_err();
        assert!(matches!(err, BadgeError::MissingDimension(_)), "{format}: {err}");
    }
    assert!(exporter
        .export(&t, &LayerOverrides::new(), ExportFormat::Svg, RasterScale::X1)
        .is_ok());
}

#[test]
fn formats_and_scales_parse() {
    assert_eq!("PNG".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
    assert!("gif".parse::<ExportFormat>().is_err());
    assert_eq!(ExportFormat::Webp.mime(), "image/webp");
    assert_eq!(RasterScale::try_from(4).unwrap(), RasterScale::X4);
    assert!(RasterScale::try_from(3).is_err());
}

#[test]
fn artifacts_write_under_their_filename() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = ExportArtifact {
        format: ExportFormat::Svg,
        bytes: b"<svg/>".to_vec(),
        mime: "image/svg+xml",
        filename: "a-1.svg".into(),
        pixel_size: None,
        page_size_mm: None,
        failed_fonts: Vec::new(),
    };
    let path = artifact.write_to_dir(&dir.path().join("out")).unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"<svg/>");
}
