use crate::{
    foundation::{
        config::ViewportPolicy,
        core::{Point, Rect, Size, ViewBox},
    },
    geometry::fit::{ScaleBounds, fit_scale},
    viewport::input::{PinchAnchor, WheelInput, classify_wheel, touch_distance},
};

/// Owns the preview `viewBox` for a container of known pixel size.
///
/// Zoom is never stored: it is always `container_width / view_box.width`. Until a usable
/// container size is known every zoom and pan operation is a no-op.
///
/// Pans accumulate unclamped; the content clamp is applied when the visible window is read, so
/// split and combined pans always agree.
#[derive(Clone, Debug)]
pub struct ViewportController {
    policy: ViewportPolicy,
    content: Option<Size>,
    container: Option<Size>,
    view_box: ViewBox,
    pinch: Option<PinchAnchor>,
    gesture_start_zoom: Option<f64>,
}

fn usable(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

impl ViewportController {
    /// `content` is the template's intrinsic size, when it has one.
    pub fn new(policy: ViewportPolicy, content: Option<Size>) -> Self {
        let content = content.filter(|s| usable(*s));
        let view_box = content
            .map(|s| ViewBox::from_size(s.width, s.height))
            .unwrap_or_else(|| ViewBox::from_size(1.0, 1.0));
        Self {
            policy,
            content,
            container: None,
            view_box,
            pinch: None,
            gesture_start_zoom: None,
        }
    }

    pub fn policy(&self) -> &ViewportPolicy {
        &self.policy
    }

    /// The visible window, with the content clamp applied.
    pub fn view_box(&self) -> ViewBox {
        if !self.policy.clamp_pan_to_content {
            return self.view_box;
        }
        let Some(content) = self.content else {
            return self.view_box;
        };
        let center = self.view_box.center();
        let clamped = Point::new(
            center.x.clamp(0.0, content.width),
            center.y.clamp(0.0, content.height),
        );
        if clamped == center {
            self.view_box
        } else {
            ViewBox::centered_on(clamped, self.view_box.width, self.view_box.height)
        }
    }

    pub fn container_size(&self) -> Option<Size> {
        self.container
    }

    pub fn content_size(&self) -> Option<Size> {
        self.content
    }

    /// `true` once a usable container size has been set.
    pub fn is_ready(&self) -> bool {
        self.container.is_some()
    }

    /// Screen pixels per template unit along x.
    pub fn pixels_per_unit(&self) -> Option<f64> {
        let container = self.container?;
        let ppu = container.width / self.view_box.width;
        (ppu.is_finite() && ppu > 0.0).then_some(ppu)
    }

    /// Current zoom; `1.0` while the container is not ready.
    pub fn zoom(&self) -> f64 {
        self.pixels_per_unit().unwrap_or(1.0)
    }

    /// Zoom as a rounded percentage for display.
    pub fn zoom_percentage(&self) -> u32 {
        (self.zoom() * 100.0).round().max(0.0) as u32
    }

    /// Record the container's pixel size.
    ///
    /// The first usable size auto-fits the content. Later resizes keep the current center and
    /// zoom. Unusable sizes are ignored.
    pub fn set_container_size(&mut self, size: Size) {
        if !usable(size) {
            return;
        }
        match self.container {
            None => {
                self.container = Some(size);
                match self.content {
                    Some(content) => self.auto_fit(content.to_rect(), size),
                    None => self.view_box = ViewBox::from_size(size.width, size.height),
                }
            }
            Some(_) => {
                let zoom = self.zoom();
                let center = self.view_box().center();
                self.container = Some(size);
                self.view_box = ViewBox::centered_on(center, size.width / zoom, size.height / zoom);
            }
        }
    }

    /// Replace the content size, e.g. after loading another template.
    pub fn set_content_size(&mut self, content: Option<Size>) {
        self.content = content.filter(|s| usable(*s));
    }

    /// Clamp `factor` to the policy zoom range and rescale around the viewBox center.
    pub fn set_zoom(&mut self, factor: f64) {
        let Some(container) = self.container else {
            return;
        };
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let zoom = factor.clamp(self.policy.min_zoom, self.policy.max_zoom);
        let center = self.view_box().center();
        self.view_box =
            ViewBox::centered_on(center, container.width / zoom, container.height / zoom);
    }

    /// Multiply the current zoom by `factor`.
    pub fn zoom_by(&mut self, factor: f64) {
        if let Some(ppu) = self.pixels_per_unit() {
            self.set_zoom(ppu * factor);
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(self.policy.wheel_step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(1.0 / self.policy.wheel_step);
    }

    /// Move the view by a pointer travel of `(dx, dy)` screen pixels.
    ///
    /// Dragging right reveals content to the left, so the viewBox moves opposite to the
    /// pointer.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let Some(ppu) = self.pixels_per_unit() else {
            return;
        };
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.view_box.x -= dx / ppu;
        self.view_box.y -= dy / ppu;
    }

    /// Fit `content_bounds` into `container` using the policy margin and fit-scale bounds.
    ///
    /// Also records `container` as the current container size. Calling it twice with the same
    /// arguments leaves the viewBox unchanged.
    pub fn auto_fit(&mut self, content_bounds: Rect, container: Size) {
        if !usable(container) {
            return;
        }
        self.container = Some(container);
        let scale = fit_scale(
            content_bounds.size(),
            container,
            self.policy.fit_margin,
            ScaleBounds::new(self.policy.min_fit_scale, self.policy.max_fit_scale),
        );
        self.view_box = ViewBox::centered_on(
            content_bounds.center(),
            container.width / scale,
            container.height / scale,
        );
        tracing::debug!(scale, view_box = %self.view_box, "auto-fit viewport");
    }

    /// Auto-fit the template content into the current container.
    pub fn fit_content(&mut self) {
        if let (Some(content), Some(container)) = (self.content, self.container) {
            self.auto_fit(content.to_rect(), container);
        }
    }

    /// Show the content at its intrinsic extent: viewBox = `(0, 0, W, H)`.
    ///
    /// Works in any state, including before the container is known.
    pub fn reset_zoom(&mut self) {
        self.pinch = None;
        self.gesture_start_zoom = None;
        if let Some(content) = self.content {
            self.view_box = ViewBox::from_size(content.width, content.height);
        }
    }

    /// Route a wheel event into `set_zoom`.
    pub fn handle_wheel(&mut self, input: WheelInput) {
        let Some(container) = self.container else {
            return;
        };
        if let Some(zoom) = classify_wheel(input, container.height, &self.policy) {
            self.zoom_by(zoom.factor());
        }
    }

    /// Capture the finger distance and zoom at the start of a two-finger pinch.
    pub fn begin_pinch(&mut self, t1: Point, t2: Point) {
        let Some(start_zoom) = self.pixels_per_unit() else {
            return;
        };
        let start_distance = touch_distance(t1, t2);
        self.pinch = (start_distance > 0.0).then_some(PinchAnchor {
            start_distance,
            start_zoom,
        });
    }

    pub fn handle_pinch(&mut self, t1: Point, t2: Point) {
        let Some(anchor) = self.pinch else {
            return;
        };
        let ratio = touch_distance(t1, t2) / anchor.start_distance;
        self.set_zoom(anchor.start_zoom * ratio);
    }

    pub fn end_pinch(&mut self) {
        self.pinch = None;
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Start of a WebKit gesture sequence.
    pub fn begin_gesture(&mut self) {
        self.gesture_start_zoom = self.pixels_per_unit();
    }

    /// `scale` is cumulative since [`Self::begin_gesture`].
    pub fn handle_gesture(&mut self, scale: f64) {
        if let Some(start) = self.gesture_start_zoom {
            self.set_zoom(start * scale);
        }
    }

    pub fn end_gesture(&mut self) {
        self.gesture_start_zoom = None;
    }

    /// Map a container-relative pixel position to template units.
    pub fn screen_to_template(&self, p: Point) -> Option<Point> {
        let ppu = self.pixels_per_unit()?;
        let vb = self.view_box();
        Some(Point::new(vb.x + p.x / ppu, vb.y + p.y / ppu))
    }

    pub fn template_to_screen(&self, p: Point) -> Option<Point> {
        let ppu = self.pixels_per_unit()?;
        let vb = self.view_box();
        Some(Point::new((p.x - vb.x) * ppu, (p.y - vb.y) * ppu))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/controller.rs"]
mod tests;
