use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use anyhow::Context;

use crate::{
    export::{
        inspect::{detect_font_families, inject_style},
        naming::suggested_filename,
        pdf::{px_to_mm, raster_pdf},
        raster::{encode_image, raster_dims, rasterize_svg},
    },
    fonts::{
        catalog::FontCatalog,
        embed::{EmbeddedFont, FontEmbedder, data_uri},
        fetch::FontFetcher,
    },
    foundation::{
        config::{BadgeConfig, ExportPolicy},
        error::{BadgeError, BadgeResult},
    },
    resolve::layer::ResolveOptions,
    scene::tree::build_render_tree,
    template::model::{LayerOverrides, Template},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Output container.
pub enum ExportFormat {
    Svg,
    Png,
    Webp,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Pdf => "application/pdf",
        }
    }

    /// Whether this format needs the template's intrinsic dimensions.
    pub fn is_raster(self) -> bool {
        !matches!(self, Self::Svg)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = BadgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            "pdf" => Ok(Self::Pdf),
            other => Err(BadgeError::validation(format!(
                "unknown export format '{other}' (expected svg, png, webp, or pdf)"
            ))),
        }
    }
}

/// Raster export multiplier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RasterScale {
    #[default]
    X1,
    X2,
    X4,
    X8,
}

impl RasterScale {
    pub fn factor(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
        }
    }
}

impl TryFrom<u32> for RasterScale {
    type Error = BadgeError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            8 => Ok(Self::X8),
            _ => Err(BadgeError::validation(format!(
                "raster scale must be 1, 2, 4, or 8, got {v}"
            ))),
        }
    }
}

/// A finished export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    /// Suggested file name, `<slug>-<epoch-ms>.<ext>`.
    pub filename: String,
    /// Raster size in pixels (PNG/WebP, and the image embedded in PDF).
    pub pixel_size: Option<(u32, u32)>,
    /// PDF page size in millimetres.
    pub page_size_mm: Option<(f64, f64)>,
    /// Font stylesheets that could not be embedded.
    pub failed_fonts: Vec<String>,
}

impl ExportArtifact {
    pub fn to_data_uri(&self) -> String {
        data_uri(self.mime, &self.bytes)
    }

    /// Write the artifact under its suggested name, creating `dir` if needed.
    pub fn write_to_dir(&self, dir: &Path) -> BadgeResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create export dir '{}'", dir.display()))?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("write export '{}'", path.display()))?;
        Ok(path)
    }
}

/// Self-contained SVG plus the fonts embedded into it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreparedDocument {
    pub svg: String,
    pub fonts: Vec<EmbeddedFont>,
    pub failed_fonts: Vec<String>,
}

/// Serializes templates to self-contained documents and converts them to the export formats.
#[derive(Clone, Debug)]
pub struct Exporter {
    policy: ExportPolicy,
    catalog: FontCatalog,
    embedder: FontEmbedder,
}

impl Exporter {
    /// Exporter fetching fonts over HTTP as configured.
    pub fn new(config: &BadgeConfig) -> Self {
        Self {
            policy: config.export.clone(),
            catalog: FontCatalog::with_extra(&config.fonts.extra_catalog),
            embedder: FontEmbedder::http(&config.fonts),
        }
    }

    /// Exporter with a caller-provided font source.
    pub fn with_fetcher(config: &BadgeConfig, fetcher: Arc<dyn FontFetcher>) -> Self {
        Self {
            policy: config.export.clone(),
            catalog: FontCatalog::with_extra(&config.fonts.extra_catalog),
            embedder: FontEmbedder::new(fetcher),
        }
    }

    pub fn policy(&self) -> &ExportPolicy {
        &self.policy
    }

    pub fn catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    /// Build the render tree at the intrinsic size, serialize it, and embed its fonts.
    pub fn prepare(&self, template: &Template, overrides: &LayerOverrides) -> PreparedDocument {
        let opts = ResolveOptions {
            clip_mode: self.policy.clip_mode,
        };
        let svg = build_render_tree(template, overrides, &opts).to_svg_markup(None);
        if !self.policy.embed_fonts {
            return PreparedDocument {
                svg,
                ..PreparedDocument::default()
            };
        }

        let families = detect_font_families(&svg);
        let imports = self.catalog.import_css(families.iter().map(String::as_str));
        if imports.is_empty() {
            return PreparedDocument {
                svg,
                ..PreparedDocument::default()
            };
        }

        let outcome = self.embedder.embed(&imports);
        PreparedDocument {
            svg: inject_style(&svg, &outcome.css),
            fonts: outcome.fonts,
            failed_fonts: outcome.failed,
        }
    }

    /// The self-contained SVG string, as used for "view" and "copy".
    pub fn export_svg_markup(&self, template: &Template, overrides: &LayerOverrides) -> String {
        self.prepare(template, overrides).svg
    }

    /// Export `template` with `overrides` as `format`. `scale` applies to PNG and WebP.
    #[tracing::instrument(skip(self, template, overrides), fields(template = %template.id))]
    pub fn export(
        &self,
        template: &Template,
        overrides: &LayerOverrides,
        format: ExportFormat,
        scale: RasterScale,
    ) -> BadgeResult<ExportArtifact> {
        let intrinsic = if format.is_raster() {
            Some(template.require_intrinsic_size()?)
        } else {
            None
        };

        let doc = self.prepare(template, overrides);
        let background = self.policy.background.as_deref();
        let name = if template.name.trim().is_empty() {
            template.id.as_str()
        } else {
            template.name.as_str()
        };

        let mut artifact = ExportArtifact {
            format,
            bytes: Vec::new(),
            mime: format.mime(),
            filename: suggested_filename(name, format.extension()),
            pixel_size: None,
            page_size_mm: None,
            failed_fonts: doc.failed_fonts.clone(),
        };

        match (format, intrinsic) {
            (ExportFormat::Svg, _) => {
                artifact.bytes = doc.svg.into_bytes();
            }
            (ExportFormat::Png | ExportFormat::Webp, Some(size)) => {
                let (w, h) =
                    raster_dims(size, scale.factor() as f64, self.policy.max_raster_dim)?;
                let img = rasterize_svg(&doc.svg, w, h, &doc.fonts, background)?;
                let image_format = if format == ExportFormat::Png {
                    image::ImageFormat::Png
                } else {
                    image::ImageFormat::WebP
                };
                artifact.bytes = encode_image(&img, image_format)?;
                artifact.pixel_size = Some((w, h));
            }
            (ExportFormat::Pdf, Some(size)) => {
                let (w, h) = raster_dims(size, 1.0, self.policy.max_raster_dim)?;
                let img = rasterize_svg(&doc.svg, w, h, &doc.fonts, background)?;
                artifact.bytes = raster_pdf(&img, name)?;
                artifact.pixel_size = Some((w, h));
                artifact.page_size_mm = Some((px_to_mm(w as f64), px_to_mm(h as f64)));
            }
            (_, None) => {
                return Err(BadgeError::export(format!(
                    "{format} export needs intrinsic dimensions"
                )));
            }
        }

        tracing::info!(
            format = %format,
            bytes = artifact.bytes.len(),
            filename = %artifact.filename,
            "export finished"
        );
        Ok(artifact)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
