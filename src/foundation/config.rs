use std::path::Path;

use anyhow::Context;

use crate::{
    fonts::catalog::FontEntry,
    foundation::error::{BadgeError, BadgeResult},
    resolve::clip::ClipMode,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Runtime policy for the viewport, export pipeline, and font embedding.
///
/// Every section falls back to its defaults, so a partial JSON document is valid input.
pub struct BadgeConfig {
    /// Zoom limits and input normalization constants.
    pub viewport: ViewportPolicy,
    /// Export pipeline switches.
    pub export: ExportPolicy,
    /// Font fetching and catalog extension.
    pub fonts: FontPolicy,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Zoom clamping and input normalization constants used by the viewport controller.
pub struct ViewportPolicy {
    /// Smallest zoom (pixels per template unit) reachable through `set_zoom`.
    pub min_zoom: f64,
    /// Largest zoom reachable through `set_zoom`.
    pub max_zoom: f64,
    /// Fraction of the container used by auto-fit.
    pub fit_margin: f64,
    /// Lower clamp applied to the auto-fit scale.
    pub min_fit_scale: f64,
    /// Upper clamp applied to the auto-fit scale.
    pub max_fit_scale: f64,
    /// Multiplicative zoom step for one discrete mouse-wheel notch.
    pub wheel_step: f64,
    /// Exponent factor for continuous trackpad pinch deltas.
    pub trackpad_sensitivity: f64,
    /// Absolute `deltaY` below which a wheel event is treated as trackpad input.
    pub trackpad_delta_threshold: f64,
    /// Pixels per line for `DOM_DELTA_LINE` wheel events.
    pub line_height_px: f64,
    /// Keep the viewBox center inside the template rectangle while panning.
    pub clamp_pan_to_content: bool,
}

impl Default for ViewportPolicy {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 8.0,
            fit_margin: 0.9,
            min_fit_scale: 0.1,
            max_fit_scale: 8.0,
            wheel_step: 1.1,
            trackpad_sensitivity: 0.01,
            trackpad_delta_threshold: 50.0,
            line_height_px: 16.0,
            clamp_pan_to_content: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Export pipeline switches.
pub struct ExportPolicy {
    /// Whether text clipping uses `<clipPath>` or `<mask>` definitions.
    pub clip_mode: ClipMode,
    /// Inline catalog fonts as base64 `@font-face` rules.
    pub embed_fonts: bool,
    /// Largest raster edge in pixels; bigger requests are refused.
    pub max_raster_dim: u32,
    /// Optional solid background painted under raster exports (CSS color).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl Default for ExportPolicy {
    fn default() -> Self {
        Self {
            clip_mode: ClipMode::ClipPath,
            embed_fonts: true,
            max_raster_dim: 16_384,
            background: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Font fetching configuration.
pub struct FontPolicy {
    /// Per-request timeout for stylesheet and font binary fetches.
    pub timeout_secs: u64,
    /// User agent sent with font requests.
    ///
    /// Stylesheet hosts pick the served font format from this header; the default asks for
    /// TrueType so rasterization can load the fetched binaries.
    pub user_agent: String,
    /// Additional catalog entries, consulted before the built-in ones.
    pub extra_catalog: Vec<FontEntry>,
}

impl Default for FontPolicy {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("badgekit/", env!("CARGO_PKG_VERSION")).to_string(),
            extra_catalog: Vec::new(),
        }
    }
}

impl BadgeConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> BadgeResult<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse, and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> BadgeResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> BadgeResult<()> {
        self.viewport.validate()?;
        if self.export.max_raster_dim == 0 {
            return Err(BadgeError::validation("export.maxRasterDim must be > 0"));
        }
        if self.fonts.timeout_secs == 0 {
            return Err(BadgeError::validation("fonts.timeoutSecs must be > 0"));
        }
        for entry in &self.fonts.extra_catalog {
            entry.validate()?;
        }
        Ok(())
    }
}

impl ViewportPolicy {
    pub fn validate(&self) -> BadgeResult<()> {
        fn positive(name: &str, v: f64) -> BadgeResult<()> {
            if !v.is_finite() || v <= 0.0 {
                return Err(BadgeError::validation(format!(
                    "viewport.{name} must be finite and > 0"
                )));
            }
            Ok(())
        }

        positive("minZoom", self.min_zoom)?;
        positive("maxZoom", self.max_zoom)?;
        positive("minFitScale", self.min_fit_scale)?;
        positive("maxFitScale", self.max_fit_scale)?;
        positive("trackpadSensitivity", self.trackpad_sensitivity)?;
        positive("trackpadDeltaThreshold", self.trackpad_delta_threshold)?;
        positive("lineHeightPx", self.line_height_px)?;
        if self.min_zoom > self.max_zoom {
            return Err(BadgeError::validation(
                "viewport.minZoom must be <= viewport.maxZoom",
            ));
        }
        if self.min_fit_scale > self.max_fit_scale {
            return Err(BadgeError::validation(
                "viewport.minFitScale must be <= viewport.maxFitScale",
            ));
        }
        if !self.fit_margin.is_finite() || self.fit_margin <= 0.0 || self.fit_margin > 1.0 {
            return Err(BadgeError::validation(
                "viewport.fitMargin must be in (0, 1]",
            ));
        }
        if !self.wheel_step.is_finite() || self.wheel_step <= 1.0 {
            return Err(BadgeError::validation("viewport.wheelStep must be > 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
