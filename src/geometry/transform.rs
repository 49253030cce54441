use std::fmt;

use crate::foundation::core::{Affine, Point, Vec2, finite_or, fmt_num};

/// One step of an SVG `transform` attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    Translate(f64, f64),
    /// Degrees, clockwise in y-down space.
    Rotate(f64),
    /// Degrees around `(cx, cy)`.
    RotateAbout(f64, f64, f64),
    Scale(f64),
}

impl TransformOp {
    pub fn to_affine(self) -> Affine {
        match self {
            Self::Translate(x, y) => Affine::translate(Vec2::new(x, y)),
            Self::Rotate(deg) => Affine::rotate(deg.to_radians()),
            Self::RotateAbout(deg, cx, cy) => {
                let c = Vec2::new(cx, cy);
                Affine::translate(c) * Affine::rotate(deg.to_radians()) * Affine::translate(-c)
            }
            Self::Scale(s) => Affine::scale(s),
        }
    }
}

impl fmt::Display for TransformOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Translate(x, y) => write!(f, "translate({} {})", fmt_num(x), fmt_num(y)),
            Self::Rotate(deg) => write!(f, "rotate({})", fmt_num(deg)),
            Self::RotateAbout(deg, cx, cy) => write!(
                f,
                "rotate({} {} {})",
                fmt_num(deg),
                fmt_num(cx),
                fmt_num(cy)
            ),
            Self::Scale(s) => write!(f, "scale({})", fmt_num(s)),
        }
    }
}

/// Ordered SVG transform list. Steps that do nothing are dropped as they are pushed, so an
/// identity list renders as the empty string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformList {
    ops: Vec<TransformOp>,
}

impl TransformList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(mut self, x: f64, y: f64) -> Self {
        let (x, y) = (finite(x), finite(y));
        if x != 0.0 || y != 0.0 {
            self.ops.push(TransformOp::Translate(x, y));
        }
        self
    }

    pub fn rotate(mut self, deg: f64) -> Self {
        let deg = finite(deg);
        if deg != 0.0 {
            self.ops.push(TransformOp::Rotate(deg));
        }
        self
    }

    pub fn rotate_about(mut self, deg: f64, center: Point) -> Self {
        let deg = finite(deg);
        if deg != 0.0 {
            self.ops.push(TransformOp::RotateAbout(
                deg,
                finite(center.x),
                finite(center.y),
            ));
        }
        self
    }

    pub fn scale(mut self, s: f64) -> Self {
        if s.is_finite() && s != 1.0 {
            self.ops.push(TransformOp::Scale(s));
        }
        self
    }

    /// Append every step of `other` after the steps of `self`.
    pub fn then(mut self, other: TransformList) -> Self {
        self.ops.extend(other.ops);
        self
    }

    pub fn ops(&self) -> &[TransformOp] {
        &self.ops
    }

    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Matrix equivalent of the list, composed left to right as SVG does.
    pub fn to_affine(&self) -> Affine {
        self.ops
            .iter()
            .fold(Affine::IDENTITY, |acc, op| acc * op.to_affine())
    }
}

impl fmt::Display for TransformList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

/// Scale and rotate around `origin` instead of the coordinate origin.
///
/// Equivalent to translating to `origin`, scaling, rotating, and translating back. Identity when
/// `scale == 1` and `rotation_deg == 0`.
pub fn scale_origin_transform(origin: Point, scale: f64, rotation_deg: f64) -> TransformList {
    let scale = if scale.is_finite() { scale } else { 1.0 };
    let rotation_deg = finite(rotation_deg);
    if scale == 1.0 && rotation_deg == 0.0 {
        return TransformList::new();
    }
    let (cx, cy) = (finite(origin.x), finite(origin.y));
    TransformList::new()
        .translate(cx, cy)
        .scale(scale)
        .rotate(rotation_deg)
        .translate(-cx, -cy)
}

fn finite(v: f64) -> f64 {
    finite_or(v, 0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/transform.rs"]
mod tests;
