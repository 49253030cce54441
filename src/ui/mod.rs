//! Host UI coordination state.

pub(crate) mod expansion;
