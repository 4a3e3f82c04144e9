use crate::layout::PositionedNode;

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

/// The animated part of a wedge: where it starts and how wide it is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngularExtent {
    pub start: f64,
    pub span: f64,
}

impl AngularExtent {
    pub const fn new(start: f64, span: f64) -> Self {
        Self { start, span }
    }

    pub fn end(&self) -> f64 {
        self.start + self.span
    }

    /// Zero-width extent at `start`, used for wedges with no prior position.
    pub const fn collapsed_at(start: f64) -> Self {
        Self { start, span: 0.0 }
    }
}

impl From<&PositionedNode> for AngularExtent {
    fn from(arc: &PositionedNode) -> Self {
        Self::new(arc.start, arc.span)
    }
}

impl Lerp for AngularExtent {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            start: <f64 as Lerp>::lerp(&a.start, &b.start, t),
            span: <f64 as Lerp>::lerp(&a.span, &b.span, t),
        }
    }
}

/// Interpolator between a wedge's previous and target angular extent.
/// Linear in both start and span; `t` is clamped to [0, 1].
pub fn interpolate(previous: AngularExtent, target: AngularExtent) -> impl Fn(f64) -> AngularExtent {
    move |t| AngularExtent::lerp(&previous, &target, t.clamp(0.0, 1.0))
}

/// Stored form of [`interpolate`], kept on each wedge for the duration of a zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcTween {
    pub from: AngularExtent,
    pub to: AngularExtent,
}

impl ArcTween {
    pub fn new(from: AngularExtent, to: AngularExtent) -> Self {
        Self { from, to }
    }

    /// A tween that is already at rest.
    pub fn settled(at: AngularExtent) -> Self {
        Self { from: at, to: at }
    }

    pub fn sample(&self, t: f64) -> AngularExtent {
        interpolate(self.from, self.to)(t)
    }
}
