//! Random stroke grids.
//!
//! Produces stroke lists for the tracer: a square lattice of junctions with a
//! random [`StrokeType`] per stroke, some strokes deleted at random, and
//! strokes left hanging off a single-stroke junction purged.
//!
//! # Example
//! ```
//! use knotwork::grid::{generate_grid, GridConfig};
//!
//! let config = GridConfig::default().with_size(1.5, 1.0);
//! let strokes = generate_grid(&config, 42);
//! assert!(knotwork::validate_strokes(&strokes).is_ok());
//! ```

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::{Stroke, StrokeType, Vec2};

/// Relative odds of each stroke type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrokeWeights {
    pub cross: u32,
    pub bounce: u32,
    pub glance: u32,
}

impl Default for StrokeWeights {
    fn default() -> Self {
        Self { cross: 13, bounce: 1, glance: 1 }
    }
}

impl StrokeWeights {
    /// Every stroke a crossing.
    pub fn cross_only() -> Self {
        Self { cross: 1, bounce: 0, glance: 0 }
    }

    fn pick(&self, rng: &mut impl Rng) -> StrokeType {
        let (cross, bounce, glance) = (u64::from(self.cross), u64::from(self.bounce), u64::from(self.glance));
        let total = cross + bounce + glance;
        if total == 0 {
            return StrokeType::Cross;
        }

        let r = rng.random_range(0..total);
        if r < bounce {
            StrokeType::Bounce
        } else if r < bounce + glance {
            StrokeType::Glance
        } else {
            StrokeType::Cross
        }
    }
}

/// Configuration for random grid generation.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Canvas width in knot units
    pub width: f64,
    /// Canvas height in knot units
    pub height: f64,
    /// Inclusive range of junction columns per unit; one value is drawn per grid
    pub junctions_per_unit: (u32, u32),
    /// Stroke type odds
    pub weights: StrokeWeights,
    /// Each stroke is deleted with probability `1 / d`, `d` drawn from this inclusive range
    pub delete_divisor: (u32, u32),
    /// Whether to delete strokes at random at all
    pub delete: bool,
    /// Purge until no dangling junction is left, instead of a single sweep
    pub repeat_purge: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 4.0 / 3.0,
            height: 1.0,
            junctions_per_unit: (6, 14),
            weights: StrokeWeights::default(),
            delete_divisor: (3, 22),
            delete: true,
            repeat_purge: true,
        }
    }
}

impl GridConfig {
    /// Create a new config with the given canvas size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Create a new config with a junction density range.
    pub fn with_density(mut self, min: u32, max: u32) -> Self {
        self.junctions_per_unit = (min.min(max), min.max(max));
        self
    }

    /// Create a new config with the given stroke type odds.
    pub fn with_weights(mut self, weights: StrokeWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Create a new config with random deletion enabled/disabled.
    pub fn with_deletion(mut self, delete: bool) -> Self {
        self.delete = delete;
        self
    }

    /// Create a new config with repeated purging enabled/disabled.
    pub fn with_repeat_purge(mut self, repeat: bool) -> Self {
        self.repeat_purge = repeat;
        self
    }
}

/// Generate a pruned random grid. The same config and seed always give the
/// same strokes.
pub fn generate_grid(config: &GridConfig, seed: u64) -> Vec<Stroke> {
    let mut rng = StdRng::seed_from_u64(seed);

    let (lo, hi) = config.junctions_per_unit;
    let per_unit = f64::from(rng.random_range(lo.min(hi)..=hi.max(lo)));
    let mut strokes = lattice(config, per_unit, &mut rng);
    let total = strokes.len();

    if config.delete {
        let (lo, hi) = config.delete_divisor;
        let divisor = f64::from(rng.random_range(lo.min(hi).max(1)..=hi.max(lo).max(1)));
        strokes.retain(|_| rng.random::<f64>() >= 1.0 / divisor);
    }
    let deleted = total - strokes.len();

    let purged = purge_dangling(&mut strokes, config.repeat_purge);

    log::debug!(
        "grid seed {}: {} junctions/unit, {} strokes, {} deleted, {} purged",
        seed,
        per_unit,
        total,
        deleted,
        purged
    );

    strokes
}

/// Square lattice inset one cell from every border.
fn lattice(config: &GridConfig, per_unit: f64, rng: &mut impl Rng) -> Vec<Stroke> {
    let columns = (per_unit * config.width) as usize;
    let rows = (per_unit * config.height) as usize;

    let x_at = |i: usize| i as f64 / columns as f64 * config.width;
    let y_at = |j: usize| j as f64 / rows as f64 * config.height;

    let mut strokes = Vec::new();
    for i in 1..columns {
        for j in 1..rows {
            let here = Vec2::new(x_at(i), y_at(j));
            if i + 1 != columns {
                strokes.push(Stroke::with_kind(here, Vec2::new(x_at(i + 1), here.y), config.weights.pick(rng)));
            }
            if j + 1 != rows {
                strokes.push(Stroke::with_kind(here, Vec2::new(here.x, y_at(j + 1)), config.weights.pick(rng)));
            }
        }
    }
    strokes
}

/// Remove strokes with an endpoint that no other stroke touches.
///
/// One sweep can leave new dangling junctions behind; with `repeat` the sweep
/// runs until nothing changes. Returns the number of strokes removed.
pub fn purge_dangling(strokes: &mut Vec<Stroke>, repeat: bool) -> usize {
    let before = strokes.len();

    loop {
        let mut degree: BTreeMap<Vec2, usize> = BTreeMap::new();
        for stroke in strokes.iter() {
            *degree.entry(stroke.a).or_default() += 1;
            *degree.entry(stroke.b).or_default() += 1;
        }

        let len = strokes.len();
        strokes.retain(|s| degree[&s.a] > 1 && degree[&s.b] > 1);

        if !repeat || strokes.len() == len {
            break;
        }
    }

    before - strokes.len()
}
