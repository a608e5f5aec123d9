//! Ribbon sampling.
//!
//! Turns each thread of an [`Art`] into a dense list of vertices with left and
//! right edges, ready to be drawn as a band. The over/under curve is sampled
//! alongside so a renderer can split the band into runs and draw under-runs
//! before over-runs.

use crate::art::{Art, Thread, Z};
use crate::geometry::Vec2;
use crate::spline::Spline;

/// Configuration for ribbon sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RibbonConfig {
    /// Distance from the centreline to either edge, in knot units
    pub half_width: f64,
    /// Vertices per thread knot interval
    pub samples_per_knot: usize,
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            half_width: 0.01,
            samples_per_knot: 25,
        }
    }
}

impl RibbonConfig {
    /// Create a new config with the given half width.
    pub fn with_half_width(mut self, half_width: f64) -> Self {
        self.half_width = half_width;
        self
    }

    /// Create a new config with the given sampling density.
    pub fn with_samples_per_knot(mut self, samples: usize) -> Self {
        self.samples_per_knot = samples.max(1);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RibbonVertex {
    /// Curve parameter of this vertex.
    pub t: f64,
    pub center: Vec2,
    pub left: Vec2,
    pub right: Vec2,
    pub over: bool,
}

/// A contiguous stretch of a ribbon that is entirely over or entirely under.
#[derive(Clone, Debug, PartialEq)]
pub struct RibbonRun<'a> {
    pub over: bool,
    pub vertices: &'a [RibbonVertex],
}

impl RibbonRun<'_> {
    /// Closed outline: left edge forward, right edge back.
    pub fn outline(&self) -> Vec<Vec2> {
        self.vertices
            .iter()
            .map(|v| v.left)
            .chain(self.vertices.iter().rev().map(|v| v.right))
            .collect()
    }
}

/// Sampled band around one thread.
#[derive(Clone, Debug, PartialEq)]
pub struct Ribbon {
    vertices: Vec<RibbonVertex>,
}

impl Ribbon {
    /// Sample `thread` over its whole domain. The last vertex repeats the first.
    pub fn from_thread(thread: &Thread, z: &Z, config: &RibbonConfig) -> Self {
        let (start, end) = thread.domain();
        let count = (thread.knot_count() - 1) * config.samples_per_knot.max(1);

        let vertices = (0..=count)
            .map(|i| {
                let t = start + (end - start) * i as f64 / count as f64;
                let center = thread.y(t);
                // Edge direction; zero where the curve stalls.
                let side = perpendicular(thread.derivative(t)) * config.half_width;
                RibbonVertex {
                    t,
                    center,
                    left: center + side,
                    right: center - side,
                    over: z.y(t) > 0.0,
                }
            })
            .collect();

        Self { vertices }
    }

    #[inline]
    pub fn vertices(&self) -> &[RibbonVertex] {
        &self.vertices
    }

    /// Split into maximal over/under runs. Neighbouring runs share their
    /// boundary vertex so the drawn band has no gaps.
    pub fn runs(&self) -> Vec<RibbonRun<'_>> {
        let mut runs = Vec::new();
        let mut start = 0;

        for i in 1..self.vertices.len() {
            if self.vertices[i].over != self.vertices[start].over {
                runs.push(RibbonRun {
                    over: self.vertices[start].over,
                    vertices: &self.vertices[start..=i],
                });
                start = i;
            }
        }

        if start + 1 < self.vertices.len() {
            runs.push(RibbonRun {
                over: self.vertices[start].over,
                vertices: &self.vertices[start..],
            });
        }

        runs
    }
}

/// Sample every thread of `art`.
pub fn ribbons(art: &Art, config: &RibbonConfig) -> Vec<Ribbon> {
    art.iter()
        .map(|(thread, z)| Ribbon::from_thread(thread, z, config))
        .collect()
}

/// Unit vector a quarter turn clockwise from `d`: `(d.y, -d.x)` normalized.
fn perpendicular(d: Vec2) -> Vec2 {
    Vec2::new(d.y, -d.x).normalized().unwrap_or(Vec2::ZERO)
}
