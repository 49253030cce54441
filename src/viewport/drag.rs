use crate::{
    foundation::core::{Point, Vec2},
    geometry::coord::Coordinate,
    template::model::{LayerOverride, LayerOverrides},
    viewport::controller::ViewportController,
};

/// An in-flight drag of one layer, converting pointer travel into template units.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerDrag {
    layer_id: String,
    pointer_start: Point,
    start_position: Point,
    position: Point,
}

impl LayerDrag {
    /// `start_position` is the layer's resolved position in template units.
    pub fn begin(layer_id: impl Into<String>, pointer_px: Point, start_position: Point) -> Self {
        Self {
            layer_id: layer_id.into(),
            pointer_start: pointer_px,
            start_position,
            position: start_position,
        }
    }

    pub fn layer_id(&self) -> &str {
        &self.layer_id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Move to the position under `pointer_px`. Keeps the last position while the viewport is
    /// not ready.
    pub fn update(&mut self, pointer_px: Point, viewport: &ViewportController) -> Point {
        if let Some(ppu) = viewport.pixels_per_unit() {
            let travel: Vec2 = pointer_px - self.pointer_start;
            if travel.x.is_finite() && travel.y.is_finite() {
                self.position = self.start_position + travel / ppu;
            }
        }
        self.position
    }

    /// Override carrying only the dragged absolute position.
    pub fn to_override(&self) -> LayerOverride {
        LayerOverride {
            x: Some(Coordinate::Absolute(self.position.x)),
            y: Some(Coordinate::Absolute(self.position.y)),
            ..LayerOverride::default()
        }
    }

    /// Write the position into `overrides`, keeping the layer's other override fields.
    pub fn apply_to(&self, overrides: &mut LayerOverrides) {
        let entry = overrides.entry(self.layer_id.clone()).or_default();
        entry.x = Some(Coordinate::Absolute(self.position.x));
        entry.y = Some(Coordinate::Absolute(self.position.y));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/drag.rs"]
mod tests;
