use crate::foundation::{config::ViewportPolicy, core::Point};

/// Unit of a wheel event's `deltaY`, mirroring `WheelEvent.deltaMode`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// A wheel event as delivered by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WheelInput {
    pub delta_y: f64,
    pub delta_mode: DeltaMode,
    /// Browsers set this on trackpad pinch, and users hold it for ctrl+wheel zoom.
    pub ctrl_key: bool,
}

impl WheelInput {
    pub fn pixels(delta_y: f64) -> Self {
        Self {
            delta_y,
            ..Self::default()
        }
    }

    pub fn pinch(delta_y: f64) -> Self {
        Self {
            delta_y,
            ctrl_key: true,
            ..Self::default()
        }
    }
}

/// What a wheel event means for zoom once normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum WheelZoom {
    /// Continuous trackpad factor.
    Continuous(f64),
    /// One discrete wheel notch; the factor is the policy step or its inverse.
    Step(f64),
}

impl WheelZoom {
    pub(crate) fn factor(self) -> f64 {
        match self {
            Self::Continuous(f) | Self::Step(f) => f,
        }
    }
}

/// Normalize `deltaY` to pixels and classify the event.
///
/// `page_px` is the container height used for `DOM_DELTA_PAGE`. Returns `None` for events
/// that carry no zoom intent.
pub(crate) fn classify_wheel(
    input: WheelInput,
    page_px: f64,
    policy: &ViewportPolicy,
) -> Option<WheelZoom> {
    if !input.delta_y.is_finite() || input.delta_y == 0.0 {
        return None;
    }
    let dy = match input.delta_mode {
        DeltaMode::Pixel => input.delta_y,
        DeltaMode::Line => input.delta_y * policy.line_height_px,
        DeltaMode::Page => input.delta_y * page_px,
    };

    // Trackpads report small or fractional pixel deltas; mouse wheels report whole notches.
    let trackpad = input.ctrl_key
        || (input.delta_mode == DeltaMode::Pixel
            && (dy.fract() != 0.0 || dy.abs() < policy.trackpad_delta_threshold));

    if trackpad {
        let factor = (-dy * policy.trackpad_sensitivity).exp();
        factor.is_finite().then_some(WheelZoom::Continuous(factor))
    } else if dy < 0.0 {
        Some(WheelZoom::Step(policy.wheel_step))
    } else {
        Some(WheelZoom::Step(1.0 / policy.wheel_step))
    }
}

/// Anchor captured at pinch start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PinchAnchor {
    pub(crate) start_distance: f64,
    pub(crate) start_zoom: f64,
}

pub(crate) fn touch_distance(t1: Point, t2: Point) -> f64 {
    let d = t1.distance(t2);
    if d.is_finite() { d } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/input.rs"]
mod tests;
