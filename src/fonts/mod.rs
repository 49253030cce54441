//! Font catalog, fetching, and `@font-face` inlining for self-contained exports.

pub(crate) mod catalog;
pub(crate) mod embed;
pub(crate) mod fetch;
