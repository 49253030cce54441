//! Render tree assembly and SVG serialization shared by preview and export.

pub(crate) mod tree;
