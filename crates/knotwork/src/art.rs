//! The traced knot: thread curves plus their over/under curves.

use crate::geometry::Vec2;
use crate::spline::{Hermite, Spline, StepSpline};

/// Centreline of one closed ribbon, parameterised over `[0, 1]`.
pub type Thread = Hermite<Vec2>;

/// Over/under flag of a thread: `1.0` over, `0.0` under.
pub type Z = StepSpline<f64>;

/// Immutable result of one tracing run.
///
/// Thread `i` and Z curve `i` share a parameter domain. Regenerating a knot
/// builds a new `Art`; an existing one is never modified, so it can be shared
/// freely between readers.
#[derive(Debug, Clone, Default)]
pub struct Art {
    threads: Vec<Thread>,
    zs: Vec<Z>,
}

impl Art {
    /// # Panics
    ///
    /// Panics if the two lists differ in length.
    pub fn new(threads: Vec<Thread>, zs: Vec<Z>) -> Self {
        assert_eq!(threads.len(), zs.len(), "every thread needs exactly one over/under curve");
        Self { threads, zs }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `index >= thread_count()`.
    pub fn thread(&self, index: usize) -> &Thread {
        self.threads.get(index).unwrap_or_else(|| {
            panic!("thread index {index} out of range for {} threads", self.threads.len())
        })
    }

    /// # Panics
    ///
    /// Panics if `index >= thread_count()`.
    pub fn z(&self, index: usize) -> &Z {
        self.zs.get(index).unwrap_or_else(|| {
            panic!("z index {index} out of range for {} threads", self.zs.len())
        })
    }

    #[inline]
    pub fn get_thread(&self, index: usize) -> Option<(&Thread, &Z)> {
        Some((self.threads.get(index)?, self.zs.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Thread, &Z)> {
        self.threads.iter().zip(&self.zs)
    }

    /// Whether thread `index` is over at parameter `t`.
    pub fn is_over(&self, index: usize, t: f64) -> bool {
        self.z(index).y(t) > 0.0
    }

    /// Total number of samples across all threads, excluding closing duplicates.
    pub fn sample_count(&self) -> usize {
        self.threads.iter().map(|t| t.knot_count() - 1).sum()
    }

    /// Bounding box of every thread sample, `(min, max)`.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut points = self.threads.iter().flat_map(|t| t.knots().ys().iter().copied());
        let first = points.next()?;

        Some(points.fold((first, first), |(lo, hi), p| {
            (
                Vec2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Vec2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Stroke;
    use crate::trace::trace;

    fn square() -> Vec<Stroke> {
        vec![
            Stroke::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)),
            Stroke::new(Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)),
            Stroke::new(Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)),
            Stroke::new(Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0)),
        ]
    }

    #[test]
    fn empty_art() {
        let art = Art::empty();
        assert_eq!(art.thread_count(), 0);
        assert!(art.get_thread(0).is_none());
        assert!(art.bounds().is_none());
    }

    #[test]
    fn indexed_access() {
        let art = trace(&square());
        assert_eq!(art.thread_count(), 2);
        assert_eq!(art.sample_count(), 8);
        assert!(art.get_thread(1).is_some());
        assert!(!art.is_over(0, 0.0));
        assert!(art.is_over(0, 0.25));
    }

    #[test]
    fn bounds_cover_samples() {
        let art = trace(&square());
        let (lo, hi) = art.bounds().unwrap();
        assert!(lo.x <= 0.5 && lo.y <= 0.5);
        assert!(hi.x >= 0.5 && hi.y >= 0.5);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn thread_out_of_range() {
        let art = trace(&square());
        let _ = art.thread(2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn z_out_of_range() {
        let _ = Art::empty().z(0);
    }

    #[test]
    fn shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Art>();
    }
}
