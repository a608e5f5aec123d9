//! Blend functions and Hermite bases.
//!
//! A [`Blend`] mixes two neighbouring samples given `t` in `[0, 1)`. The
//! marker types here are zero-sized; they select the function at compile
//! time for [`super::LocalSpline`].

use std::f64::consts::PI;

use super::Sample;

/// Two-point interpolation function.
pub trait Blend {
    fn blend<S: Sample>(y0: S, y1: S, t: f64) -> S;
}

/// Straight line between the samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

/// Cosine-eased blend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

/// Nearest neighbour: jumps at `t = 0.5`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Step;

/// Holds `y0` across the whole interval and jumps at `t = 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LateStep;

/// `3t² - 2t³` easing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothStep;

/// Quadratic ease-in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accel;

/// Quadratic ease-out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decel;

impl Blend for Linear {
    #[inline]
    fn blend<S: Sample>(y0: S, y1: S, t: f64) -> S {
        // Same line as y0 + (y1 - y0) * t, but exact at t = 0 and t = 1.
        y0 * (1.0 - t) + y1 * t
    }
}

impl Blend for Cosine {
    #[inline]
    fn blend<S: Sample>(y0: S, y1: S, t: f64) -> S {
        Linear::blend(y0, y1, 0.5 - (t * PI).cos() / 2.0)
    }
}

impl Blend for Step {
    #[inline]
    fn blend<S: Sample>(y0: S, y1: S, t: f64) -> S {
        if t < 0.5 { y0 } else { y1 }
    }
}

impl Blend for LateStep {
    #[inline]
    fn blend<S: Sample>(y0: S, y1: S, t: f64) -> S {
        if t < 1.0 { y0 } else { y1 }
    }
}

impl Blend for SmoothStep {
    #[inline]
    fn blend<S: Sample>(y0: S, y1: S, t: f64) -> S {
        Linear::blend(y0, y1, t * t * (3.0 - 2.0 * t))
    }
}

impl Blend for Accel {
    #[inline]
    fn blend<S: Sample>(y0: S, y1: S, t: f64) -> S {
        Linear::blend(y0, y1, t * t)
    }
}

impl Blend for Decel {
    #[inline]
    fn blend<S: Sample>(y0: S, y1: S, t: f64) -> S {
        Linear::blend(y0, y1, 1.0 - (1.0 - t) * (1.0 - t))
    }
}

// ============================================================================
// HERMITE BASIS
// ============================================================================

#[inline]
fn h00(t: f64) -> f64 {
    let t2 = t * t;
    2.0 * t2 * t - 3.0 * t2 + 1.0
}

#[inline]
fn h01(t: f64) -> f64 {
    let t2 = t * t;
    -2.0 * t2 * t + 3.0 * t2
}

#[inline]
fn h10(t: f64) -> f64 {
    let t2 = t * t;
    t2 * t - 2.0 * t2 + t
}

#[inline]
fn h11(t: f64) -> f64 {
    let t2 = t * t;
    t2 * t - t2
}

/// Cubic Hermite segment from `y0` (tangent `m0`) to `y1` (tangent `m1`).
///
/// Tangents are in units of the normalized interval parameter `t`.
#[inline]
pub fn hermite<S: Sample>(m0: S, y0: S, y1: S, m1: S, t: f64) -> S {
    y0 * h00(t) + y1 * h01(t) + m0 * h10(t) + m1 * h11(t)
}

/// Derivative of [`hermite`] with respect to `t`.
#[inline]
pub fn hermite_derivative<S: Sample>(m0: S, y0: S, y1: S, m1: S, t: f64) -> S {
    let t2 = t * t;
    let d00 = 6.0 * t2 - 6.0 * t;
    let d01 = 6.0 * t - 6.0 * t2;
    let d10 = 3.0 * t2 - 4.0 * t + 1.0;
    let d11 = 3.0 * t2 - 2.0 * t;
    y0 * d00 + y1 * d01 + m0 * d10 + m1 * d11
}

/// Cardinal segment between `y1` and `y2` with tension `c`, uniform knots.
#[inline]
pub fn cardinal<S: Sample>(y0: S, y1: S, y2: S, y3: S, c: f64, t: f64) -> S {
    let m1 = (y2 - y0) * c;
    let m2 = (y3 - y1) * c;
    hermite(m1, y1, y2, m2, t)
}

/// Catmull-Rom segment between `y1` and `y2`, uniform knots.
#[inline]
pub fn catmull_rom<S: Sample>(y0: S, y1: S, y2: S, y3: S, t: f64) -> S {
    let t2 = t * t;
    let t3 = t2 * t;

    (y1 * 2.0
        + (y2 - y0) * t
        + (y0 * 2.0 - y1 * 5.0 + y2 * 4.0 - y3) * t2
        + (y1 * 3.0 - y0 - y2 * 3.0 + y3) * t3)
        * 0.5
}
