use super::blend;
use super::{Knots, Sample, Spline};

/// Cardinal spline with non-uniform knot support.
///
/// Interpolates between knots `i` and `i + 1` with tangents derived from
/// knots `i - 1` and `i + 2`, scaled by `tension`. Tangents are rescaled by
/// the ratio of neighbouring interval lengths so uneven spacing does not kink
/// the curve. Without looping the missing neighbour at either end is a
/// reflection, which gives the curve zero slope at its first and last knot.
#[derive(Debug, Clone)]
pub struct Cardinal<S> {
    knots: Knots<S>,
    tension: f64,
}

/// Catmull-Rom spline. Assumes uniformly spaced knots; for uneven spacing use
/// a [`Cardinal`] with tension `0.5`.
#[derive(Debug, Clone)]
pub struct CatmullRom<S> {
    knots: Knots<S>,
}

/// Neighbour samples `(y0, y1, y2, y3)` around interval `i`.
fn neighbours<S: Sample>(knots: &Knots<S>, i: usize) -> (S, S, S, S) {
    let n = knots.len();
    let looping = knots.is_looping();
    let at = |k: isize| knots.y_at(k);
    let i = i as isize;

    // When looping, the last knot duplicates the first, so skip over it.
    let y0 = match (i == 0, looping) {
        (true, true) => at(i - 2),
        (true, false) => at(i + 1),
        (false, _) => at(i - 1),
    };
    let y3 = match (i + 2 == n as isize, looping) {
        (true, true) => at(i + 3),
        (true, false) => at(i),
        (false, _) => at(i + 2),
    };

    (y0, at(i), at(i + 1), y3)
}

impl<S: Sample> Cardinal<S> {
    pub const CATMULL_ROM_TENSION: f64 = 0.5;

    /// See [`Knots::new`] for the contract on `xs` and `ys`.
    pub fn new(xs: Vec<f64>, ys: Vec<S>, looping: bool, tension: f64) -> Self {
        Self { knots: Knots::new(xs, ys, looping), tension }
    }

    /// Cardinal spline with the Catmull-Rom tension of `0.5`.
    pub fn catmull_rom(xs: Vec<f64>, ys: Vec<S>, looping: bool) -> Self {
        Self::new(xs, ys, looping, Self::CATMULL_ROM_TENSION)
    }

    #[inline]
    pub fn tension(&self) -> f64 {
        self.tension
    }
}

impl<S: Sample> Spline<S> for Cardinal<S> {
    fn knots(&self) -> &Knots<S> {
        &self.knots
    }

    fn y(&self, x: f64) -> S {
        let k = &self.knots;
        let (i, t) = k.locate(x);
        let (y0, y1, y2, y3) = neighbours(k, i);

        let n = k.len() as isize;
        let looping = k.is_looping();
        let ii = i as isize;

        let x1 = k.x_at(ii);
        let x2 = k.x_at(ii + 1);
        let dx = x2 - x1;

        let dx1 = match (ii == 0, looping) {
            (true, true) => k.x_at(n - 1) - k.x_at(n - 2),
            (true, false) => 0.0,
            (false, _) => x1 - k.x_at(ii - 1),
        };
        let dx2 = match (ii + 2 == n, looping) {
            (true, true) => k.x_at(1) - k.x_at(0),
            (true, false) => 0.0,
            (false, _) => k.x_at(ii + 2) - x2,
        };

        // Both factors are 1 for uniform spacing.
        let h1 = 2.0 * dx / (dx1 + dx);
        let h2 = 2.0 * dx / (dx + dx2);

        let m1 = (y2 - y0) * (h1 * self.tension);
        let m2 = (y3 - y1) * (h2 * self.tension);

        blend::hermite(m1, y1, y2, m2, t)
    }
}

impl<S: Sample> CatmullRom<S> {
    /// See [`Knots::new`] for the contract on `xs` and `ys`.
    pub fn new(xs: Vec<f64>, ys: Vec<S>, looping: bool) -> Self {
        Self { knots: Knots::new(xs, ys, looping) }
    }
}

impl<S: Sample> Spline<S> for CatmullRom<S> {
    fn knots(&self) -> &Knots<S> {
        &self.knots
    }

    fn y(&self, x: f64) -> S {
        let (i, t) = self.knots.locate(x);
        let (y0, y1, y2, y3) = neighbours(&self.knots, i);
        blend::catmull_rom(y0, y1, y2, y3, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform_xs(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn passes_through_knots() {
        let ys = vec![0.0, 2.0, -1.0, 3.0, 1.0];
        let cardinal = Cardinal::new(uniform_xs(5), ys.clone(), false, 0.3);
        let catmull = CatmullRom::new(uniform_xs(5), ys.clone(), false);

        for (i, y) in ys.iter().enumerate() {
            assert_relative_eq!(cardinal.y(i as f64), *y, epsilon = 1e-12);
            assert_relative_eq!(catmull.y(i as f64), *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn half_tension_matches_catmull_rom_on_uniform_knots() {
        let ys = vec![1.0, 4.0, 2.0, 8.0, 5.0, 0.0];
        let cardinal = Cardinal::catmull_rom(uniform_xs(6), ys.clone(), false);
        let catmull = CatmullRom::new(uniform_xs(6), ys, false);

        for i in 0..=50 {
            let x = i as f64 / 10.0;
            assert_relative_eq!(cardinal.y(x), catmull.y(x), epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_slope_at_open_ends() {
        let spline = Cardinal::catmull_rom(uniform_xs(4), vec![0.0, 1.0, 3.0, 6.0], false);
        let h = 1e-6;

        let start_slope = (spline.y(h) - spline.y(0.0)) / h;
        let end_slope = (spline.y(3.0) - spline.y(3.0 - h)) / h;
        assert!(start_slope.abs() < 1e-4, "start slope {}", start_slope);
        assert!(end_slope.abs() < 1e-4, "end slope {}", end_slope);
    }

    #[test]
    fn looping_is_smooth_across_the_seam() {
        let ys = vec![0.0, 1.0, 0.0, -1.0, 0.0];
        let spline = CatmullRom::new(uniform_xs(5), ys, true);
        let h = 1e-5;

        let before = (spline.y(4.0 - h) - spline.y(4.0 - 2.0 * h)) / h;
        let after = (spline.y(h) - spline.y(0.0)) / h;
        assert_relative_eq!(before, after, epsilon = 1e-3);
    }

    #[test]
    fn non_uniform_knots_stay_on_samples() {
        let xs = vec![0.0, 0.1, 0.5, 2.0];
        let ys = vec![1.0, 2.0, 0.0, 5.0];
        let spline = Cardinal::new(xs.clone(), ys.clone(), false, 0.5);

        for (x, y) in xs.iter().zip(&ys) {
            assert_relative_eq!(spline.y(*x), *y, epsilon = 1e-12);
        }
        assert!(spline.y(1.0).is_finite());
    }
}
