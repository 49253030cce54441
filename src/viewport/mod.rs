//! Interactive preview viewport: zoom, pan, fit, and pointer input normalization.

pub(crate) mod controller;
pub(crate) mod drag;
pub(crate) mod input;
