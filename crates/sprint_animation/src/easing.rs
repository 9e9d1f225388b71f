//! Easing functions for animations
//!
//! Nine curve families, each usable in three modes. Every family is defined
//! by its ease-in curve; ease-out and ease-in-out are reflections of it, so
//! all modes share the same endpoints and ease-in-out is point-symmetric
//! around `t = 0.5`.

use std::f32::consts::PI;

/// Curve family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EasingFamily {
    Back,
    Bounce,
    Circular,
    Cubic,
    Elastic,
    Exponential,
    Quadratic,
    Quintic,
    Sine,
}

impl EasingFamily {
    /// All families, in a stable order
    pub const ALL: [EasingFamily; 9] = [
        EasingFamily::Back,
        EasingFamily::Bounce,
        EasingFamily::Circular,
        EasingFamily::Cubic,
        EasingFamily::Elastic,
        EasingFamily::Exponential,
        EasingFamily::Quadratic,
        EasingFamily::Quintic,
        EasingFamily::Sine,
    ];

    /// Raw ease-in curve, without endpoint snapping
    fn ease_in_raw(self, t: f32) -> f32 {
        match self {
            EasingFamily::Back => {
                const OVERSHOOT: f32 = 1.70158;
                t * t * ((OVERSHOOT + 1.0) * t - OVERSHOOT)
            }
            EasingFamily::Bounce => 1.0 - bounce_out(1.0 - t),
            EasingFamily::Circular => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            EasingFamily::Cubic => t * t * t,
            EasingFamily::Elastic => {
                const PERIOD: f32 = 0.3;
                let shift = PERIOD / 4.0;
                let u = t - 1.0;
                -(2f32.powf(10.0 * u) * ((u - shift) * (2.0 * PI) / PERIOD).sin())
            }
            EasingFamily::Exponential => 2f32.powf(10.0 * (t - 1.0)),
            EasingFamily::Quadratic => t * t,
            EasingFamily::Quintic => t * t * t * t * t,
            EasingFamily::Sine => 1.0 - (t * PI / 2.0).cos(),
        }
    }

    /// Ease-in curve with exact endpoints
    fn ease_in(self, t: f32) -> f32 {
        if t <= 0.0 {
            0.0
        } else if t >= 1.0 {
            1.0
        } else {
            self.ease_in_raw(t)
        }
    }

    /// Evaluate this family in the given mode
    pub fn apply(self, mode: EasingMode, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match mode {
            EasingMode::EaseIn => self.ease_in(t),
            EasingMode::EaseOut => 1.0 - self.ease_in(1.0 - t),
            EasingMode::EaseInOut => {
                if t < 0.5 {
                    self.ease_in(2.0 * t) / 2.0
                } else {
                    1.0 - self.ease_in(2.0 * (1.0 - t)) / 2.0
                }
            }
        }
    }
}

/// Which end(s) of the curve the family shapes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EasingMode {
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

/// Easing function type
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    /// One of the named curve families
    Curve(EasingFamily, EasingMode),
    /// CSS-style cubic bezier with control points (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
}

impl Default for Easing {
    fn default() -> Self {
        Easing::EASE_BOTH
    }
}

impl Easing {
    /// Slow start and end, the usual toolkit default
    pub const EASE_BOTH: Easing = Easing::CubicBezier(0.42, 0.0, 0.58, 1.0);

    pub const fn curve(family: EasingFamily, mode: EasingMode) -> Self {
        Easing::Curve(family, mode)
    }

    /// Apply the easing function to a progress value (0.0 to 1.0).
    ///
    /// Input outside the range is clamped. Output may leave the range for
    /// overshooting curves.
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t.clamp(0.0, 1.0),
            Easing::Curve(family, mode) => family.apply(*mode, t),
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
        }
    }
}

impl From<EasingFamily> for Easing {
    fn from(family: EasingFamily) -> Self {
        Easing::Curve(family, EasingMode::default())
    }
}

impl From<(EasingFamily, EasingMode)> for Easing {
    fn from((family, mode): (EasingFamily, EasingMode)) -> Self {
        Easing::Curve(family, mode)
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// Cubic bezier easing calculation (matches CSS spec / browser implementations).
///
/// Uses Newton-Raphson with binary-search fallback for robustness.
/// Computes in f64 internally to avoid f32 precision jitter at high frame rates.
fn cubic_bezier_ease(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    // Endpoints are always exact
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let x = t as f64;
    let x1 = x1 as f64;
    let y1 = y1 as f64;
    let x2 = x2 as f64;
    let y2 = y2 as f64;

    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_sample(p, y1, y2) as f32;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..20 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2) as f32
}

/// Evaluate cubic bezier at parameter t: B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// Derivative of cubic bezier: B'(t) = 3(1-t)²·p1 + 6(1-t)t·(p2-p1) + 3t²·(1-p2)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
