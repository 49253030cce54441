//! Template + overrides to render elements: layer merging, paint injection, clip definitions.

pub(crate) mod clip;
pub(crate) mod layer;
pub(crate) mod paint;
