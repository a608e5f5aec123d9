use super::blend;
use super::{Knots, Sample, Spline};

/// Cubic Hermite spline with one caller-supplied tangent per knot.
///
/// Tangents are expressed per interval: a tangent `m` at a knot moves the
/// curve by `m` over a whole interval of the normalized parameter, no matter
/// how wide that interval is in `x`.
#[derive(Debug, Clone)]
pub struct Hermite<S> {
    knots: Knots<S>,
    tangents: Vec<S>,
}

impl<S: Sample> Hermite<S> {
    /// See [`Knots::new`] for the contract on `xs` and `ys`.
    ///
    /// # Panics
    ///
    /// Panics if `tangents` does not have one entry per knot.
    pub fn new(xs: Vec<f64>, ys: Vec<S>, tangents: Vec<S>, looping: bool) -> Self {
        assert_eq!(ys.len(), tangents.len(), "one tangent per knot is required");
        Self { knots: Knots::new(xs, ys, looping), tangents }
    }

    #[inline]
    pub fn tangents(&self) -> &[S] {
        &self.tangents
    }

    /// Tangent at a knot; the index wraps around in both directions.
    #[inline]
    pub fn tangent_at(&self, index: isize) -> S {
        self.tangents[index.rem_euclid(self.tangents.len() as isize) as usize]
    }

    /// Derivative of the curve with respect to `x`.
    pub fn derivative(&self, x: f64) -> S {
        let (i, t) = self.knots.locate(x);
        let i = i as isize;
        let dx = self.knots.x_at(i + 1) - self.knots.x_at(i);
        let d = blend::hermite_derivative(
            self.tangent_at(i),
            self.knots.y_at(i),
            self.knots.y_at(i + 1),
            self.tangent_at(i + 1),
            t,
        );
        d * (1.0 / dx)
    }
}

impl<S: Sample> Spline<S> for Hermite<S> {
    fn knots(&self) -> &Knots<S> {
        &self.knots
    }

    fn y(&self, x: f64) -> S {
        let (i, t) = self.knots.locate(x);
        let i = i as isize;
        blend::hermite(
            self.tangent_at(i),
            self.knots.y_at(i),
            self.knots.y_at(i + 1),
            self.tangent_at(i + 1),
            t,
        )
    }
}
