/// Convenience result type used across badgekit.
pub type BadgeResult<T> = Result<T, BadgeError>;

/// Top-level error taxonomy used by badgekit APIs.
///
/// Degraded paths (unparseable foreign SVG, invalid numeric input, a container that is not laid
/// out yet) are not errors and never surface here.
#[derive(thiserror::Error, Debug)]
pub enum BadgeError {
    /// The template has no intrinsic width/height, so a raster or PDF export was refused.
    #[error("missing dimension: {0}")]
    MissingDimension(String),

    /// Invalid template, override, or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while building or rasterizing a render tree.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while encoding an export artifact.
    #[error("export error: {0}")]
    Export(String),

    /// A font stylesheet or binary could not be fetched.
    #[error("font fetch error: {0}")]
    FontFetch(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BadgeError {
    /// Build a [`BadgeError::MissingDimension`] value.
    pub fn missing_dimension(msg: impl Into<String>) -> Self {
        Self::MissingDimension(msg.into())
    }

    /// Build a [`BadgeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BadgeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BadgeError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`BadgeError::FontFetch`] value.
    pub fn font_fetch(msg: impl Into<String>) -> Self {
        Self::FontFetch(msg.into())
    }

    /// Build a [`BadgeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for BadgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
