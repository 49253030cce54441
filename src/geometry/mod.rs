//! Pure geometry: coordinate resolution, foreign-SVG centroids, transform composition, fitting.

pub(crate) mod centroid;
pub(crate) mod coord;
pub(crate) mod fit;
pub(crate) mod transform;
