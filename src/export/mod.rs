//! Export pipeline: self-contained SVG, PNG/WebP rasters, and raster-in-PDF.

pub(crate) mod inspect;
pub(crate) mod naming;
pub(crate) mod pdf;
pub(crate) mod pipeline;
pub(crate) mod raster;
