use crate::foundation::core::Size;

/// Inclusive clamp range for fit scales.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl ScaleBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(self, v: f64) -> f64 {
        v.max(self.min).min(self.max)
    }
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self::new(0.1, 8.0)
    }
}

/// Largest uniform scale that fits `content` inside `container`, times `margin_ratio`, clamped.
///
/// Degenerate sizes (zero, negative, non-finite) yield `1.0` so callers never divide by zero.
pub fn fit_scale(content: Size, container: Size, margin_ratio: f64, bounds: ScaleBounds) -> f64 {
    let usable = |s: Size| {
        s.width.is_finite() && s.height.is_finite() && s.width > 0.0 && s.height > 0.0
    };
    if !usable(content) || !usable(container) {
        return 1.0;
    }
    let margin = if margin_ratio.is_finite() && margin_ratio > 0.0 {
        margin_ratio
    } else {
        1.0
    };
    let raw = (container.width / content.width).min(container.height / content.height) * margin;
    bounds.clamp(raw)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/fit.rs"]
mod tests;
