//! Interpolation over ordered knots.
//!
//! A spline is built from strictly increasing parameter values (`xs`), one
//! sample per knot (`ys`) and a `looping` flag. Evaluation never fails:
//! looping splines wrap `x` into the knot range, non-looping splines clamp to
//! the first or last interval and extrapolate with that interval's basis.
//!
//! Samples can be anything that adds and scales by `f64`, so the same code
//! drives scalar curves (`f64`) and planar curves ([`crate::Vec2`]).
//!
//! ## Variants
//!
//! - [`LocalSpline`] blends the two neighbouring samples with a [`Blend`]
//!   function (linear, cosine, step, late step, smoothstep, accel, decel).
//! - [`Cardinal`] and [`CatmullRom`] use four neighbours to derive tangents.
//! - [`Hermite`] takes one explicit tangent per knot.
//!
//! ## Lookup cost
//!
//! Each spline remembers the last interval it resolved and searches outward
//! from there, so sweeping `x` monotonically costs O(1) per evaluation.

pub mod blend;
mod cardinal;
mod hermite;
mod local;

use std::ops::{Add, Mul, Sub};
use std::sync::atomic::{AtomicUsize, Ordering};

pub use blend::Blend;
pub use cardinal::{Cardinal, CatmullRom};
pub use hermite::Hermite;
pub use local::{
    AccelSpline, CosineSpline, DecelSpline, LateStepSpline, LinearSpline, LocalSpline,
    SmoothStepSpline, StepSpline,
};

/// A value that can be interpolated.
pub trait Sample: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f64, Output = Self> {}

impl<T> Sample for T where T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T> {}

/// A curve evaluable at any parameter value.
pub trait Spline<S: Sample> {
    /// Knot storage shared by every variant.
    fn knots(&self) -> &Knots<S>;

    /// Evaluate the curve at `x`.
    fn y(&self, x: f64) -> S;

    fn knot_count(&self) -> usize {
        self.knots().len()
    }

    fn is_looping(&self) -> bool {
        self.knots().is_looping()
    }

    /// Parameter range covered by the knots, `(first, last)`.
    fn domain(&self) -> (f64, f64) {
        self.knots().domain()
    }
}

/// Knots and samples of a spline, with the cached interval index.
#[derive(Debug)]
pub struct Knots<S> {
    xs: Vec<f64>,
    ys: Vec<S>,
    looping: bool,
    // Search hint only; relaxed ordering is enough and keeps `&self` evaluation `Sync`.
    cursor: AtomicUsize,
}

impl<S: Sample> Knots<S> {
    /// Create knot storage.
    ///
    /// # Panics
    ///
    /// Panics if there are fewer than two knots, if `xs` and `ys` differ in
    /// length, or if `xs` is not strictly increasing. These are caller bugs.
    pub fn new(xs: Vec<f64>, ys: Vec<S>, looping: bool) -> Self {
        assert!(xs.len() >= 2, "a spline needs at least 2 knots, got {}", xs.len());
        assert_eq!(xs.len(), ys.len(), "knot and sample counts differ");
        assert!(
            xs.windows(2).all(|w| w[1] > w[0]),
            "spline knots must be strictly increasing"
        );
        Self { xs, ys, looping, cursor: AtomicUsize::new(0) }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false: construction requires two knots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    #[inline]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    #[inline]
    pub fn ys(&self) -> &[S] {
        &self.ys
    }

    #[inline]
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Knot position; the index wraps around in both directions.
    #[inline]
    pub fn x_at(&self, index: isize) -> f64 {
        self.xs[wrap_index(index, self.xs.len())]
    }

    /// Sample value; the index wraps around in both directions.
    #[inline]
    pub fn y_at(&self, index: isize) -> S {
        self.ys[wrap_index(index, self.ys.len())]
    }

    /// Resolve `x` to an interval index `i` (blending knot `i` and `i + 1`)
    /// and the normalized position `t` inside it.
    ///
    /// For looping knots `t` is in `[0, 1)`. Otherwise `x` outside the range
    /// lands in the first or last interval and `t` leaves `[0, 1]`.
    pub fn locate(&self, x: f64) -> (usize, f64) {
        let (first, last) = self.domain();
        let x = if self.looping { wrap(x, first, last) } else { x };

        let last_interval = self.xs.len() - 2;
        let mut i = self.cursor.load(Ordering::Relaxed).min(last_interval);

        loop {
            if self.xs[i] <= x {
                if self.xs[i + 1] > x || i == last_interval {
                    break;
                }
                i += 1;
            } else {
                if i == 0 {
                    break;
                }
                i -= 1;
            }
        }

        self.cursor.store(i, Ordering::Relaxed);

        let start = self.xs[i];
        let end = self.xs[i + 1];
        (i, (x - start) / (end - start))
    }
}

impl<S: Clone> Clone for Knots<S> {
    fn clone(&self) -> Self {
        Self {
            xs: self.xs.clone(),
            ys: self.ys.clone(),
            looping: self.looping,
            cursor: AtomicUsize::new(self.cursor.load(Ordering::Relaxed)),
        }
    }
}

/// Wrap `x` into `[start, end)`.
pub fn wrap(x: f64, start: f64, end: f64) -> f64 {
    let range = end - start;
    let mut d = ((x - start) / range).abs();
    d -= d.floor();
    d *= range;

    let wrapped = if x >= start { start + d } else { end - d };

    // Rounding (or an exact negative multiple of the range) can land on `end`.
    if wrapped >= end { start } else { wrapped }
}

#[inline]
fn wrap_index(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn wrap_inside_range_is_identity() {
        assert_eq!(wrap(0.25, 0.0, 1.0), 0.25);
        assert_eq!(wrap(0.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn wrap_outside_range() {
        assert_relative_eq!(wrap(1.25, 0.0, 1.0), 0.25);
        assert_relative_eq!(wrap(-0.25, 0.0, 1.0), 0.75);
        assert_relative_eq!(wrap(7.5, 2.0, 4.0), 3.5);
    }

    #[test]
    fn wrap_never_returns_end() {
        assert_eq!(wrap(1.0, 0.0, 1.0), 0.0);
        assert_eq!(wrap(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(wrap(-3.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn locate_walks_from_cached_index() {
        let knots = Knots::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0; 4], false);

        assert_eq!(knots.locate(2.5), (2, 0.5));
        assert_eq!(knots.locate(0.5), (0, 0.5));
        assert_eq!(knots.locate(1.0), (1, 0.0));
    }

    #[test]
    fn locate_clamps_without_loop() {
        let knots = Knots::new(vec![0.0, 1.0, 2.0], vec![0.0; 3], false);

        let (i, t) = knots.locate(-1.0);
        assert_eq!(i, 0);
        assert_eq!(t, -1.0);

        let (i, t) = knots.locate(3.0);
        assert_eq!(i, 1);
        assert_eq!(t, 2.0);
    }

    #[test]
    fn locate_wraps_with_loop() {
        let knots = Knots::new(vec![0.0, 0.5, 1.0], vec![0.0; 3], true);

        let (i, t) = knots.locate(1.25);
        assert_eq!(i, 0);
        assert_relative_eq!(t, 0.5);

        let (i, t) = knots.locate(-0.25);
        assert_eq!(i, 1);
        assert_relative_eq!(t, 0.5);
    }

    #[test]
    fn locate_survives_nan() {
        let knots = Knots::new(vec![0.0, 1.0, 2.0], vec![0.0; 3], false);
        let (i, t) = knots.locate(f64::NAN);
        assert_eq!(i, 0);
        assert!(t.is_nan());
    }

    #[test]
    fn indices_wrap_both_ways() {
        let knots = Knots::new(vec![0.0, 1.0, 2.0], vec![10.0, 11.0, 12.0], true);
        assert_eq!(knots.y_at(-1), 12.0);
        assert_eq!(knots.y_at(3), 10.0);
        assert_eq!(knots.x_at(-2), 1.0);
    }

    #[test]
    #[should_panic(expected = "at least 2 knots")]
    fn single_knot_is_rejected() {
        let _ = Knots::new(vec![0.0], vec![1.0], false);
    }

    #[test]
    #[should_panic(expected = "strictly increasing")]
    fn non_monotonic_knots_are_rejected() {
        let _ = Knots::new(vec![0.0, 2.0, 1.0], vec![0.0; 3], false);
    }

    #[test]
    #[should_panic(expected = "counts differ")]
    fn mismatched_lengths_are_rejected() {
        let _ = Knots::new(vec![0.0, 1.0], vec![0.0; 3], false);
    }
}
