//! Thread tracing.
//!
//! Walks the directional nodes of a [`Graph`] and splits them into closed
//! threads. Each pass starts at an unconsumed node, follows the ribbon through
//! stroke midpoints and around junctions, and stops when no legal continuation
//! is left. Every pass yields one [`ThreadPath`]; the collection of all passes
//! becomes an [`Art`].
//!
//! Over/under alternation is enforced with a pending set: when a ribbon goes
//! under a crossing, the perpendicular pair of nodes at that crossing is
//! reserved, and the next pass starts from a reserved node going over.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::FRAC_PI_4;

use crate::art::{Art, Thread, Z};
use crate::error::KnotError;
use crate::geometry::{Stroke, StrokeType, Vec2};
use crate::graph::{Crossing, Dir, Graph, Node};

/// Length of a crossing tangent relative to the stroke length.
const CROSS_TANGENT_SCALE: f64 = 1.3;
/// How far bounce and glance samples sit off the midpoint.
const TURN_OFFSET: f64 = 0.25;
/// Tangent length at bounce and glance samples.
const TURN_TANGENT_SCALE: f64 = 0.3;

/// One point of a thread, recorded as the ribbon leaves a stroke midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreadSample {
    pub position: Vec2,
    pub tangent: Vec2,
    /// Whether the ribbon is over when it passes this sample.
    pub over: bool,
    pub kind: StrokeType,
}

/// Samples of one traced thread, before they become curves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadPath {
    pub samples: Vec<ThreadSample>,
    /// Nodes this pass consumed.
    pub consumed: usize,
}

impl ThreadPath {
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of over/under toggles along the path.
    pub fn crossings(&self) -> usize {
        self.samples.iter().filter(|s| s.kind == StrokeType::Cross).count()
    }

    /// Close the path into a looping thread curve and its over/under curve.
    ///
    /// Sample `i` of `k` sits at parameter `i / k`; the first sample is
    /// repeated at `1.0`.
    ///
    /// # Panics
    ///
    /// Panics on an empty path.
    pub fn into_curves(self) -> (Thread, Z) {
        assert!(!self.samples.is_empty(), "cannot close an empty thread");

        let k = self.samples.len();
        let mut xs: Vec<f64> = (0..k).map(|i| i as f64 / k as f64).collect();
        xs.push(1.0);

        let first = self.samples[0];
        let closed = || self.samples.iter().chain(std::iter::once(&first));

        let positions = closed().map(|s| s.position).collect();
        let tangents = closed().map(|s| s.tangent).collect();
        let zs = closed().map(|s| if s.over { 1.0 } else { 0.0 }).collect();

        (Thread::new(xs.clone(), positions, tangents, true), Z::new(xs, zs, true))
    }
}

/// Incremental tracer. Yields one [`ThreadPath`] per pass.
#[derive(Debug, Clone)]
pub struct Tracer {
    graph: Graph,
    pending: BTreeSet<Node>,
}

impl Tracer {
    pub fn new(strokes: &[Stroke]) -> Self {
        Self::from_graph(Graph::new(strokes))
    }

    pub fn from_graph(graph: Graph) -> Self {
        Self { graph, pending: BTreeSet::new() }
    }

    /// True once every node has been consumed.
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty() && self.graph.unused_count() == 0
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Reserved nodes waiting for an over pass.
    #[inline]
    pub fn pending(&self) -> &BTreeSet<Node> {
        &self.pending
    }

    /// Trace the next thread, or `None` when nothing is left.
    pub fn next_thread(&mut self) -> Option<ThreadPath> {
        let (mut current, mut over) = match self.pending.first() {
            Some(&node) => (node, true),
            None => (self.graph.first_unused()?, false),
        };

        let mut path = ThreadPath::default();

        loop {
            let Some(&crossing) = self.graph.crossing(current.mid) else {
                break;
            };
            let entered_over = over;

            if !over && crossing.kind == StrokeType::Cross {
                self.reserve_over(current);
            }

            path.consumed += self.spend(current);

            let exit = current.dir.exit(crossing.kind);
            path.consumed += self.spend(current.with_dir(exit));

            if crossing.kind == StrokeType::Cross {
                over = !over;
            }

            path.samples.push(sample(current.mid, &crossing, exit, entered_over));

            let junction = crossing.junction(exit.is_left());
            match self.continuation(current.mid, junction, exit) {
                Some(next) => current = next,
                None => break,
            }
        }

        log::debug!(
            "thread {} samples, {} crossings, {} nodes consumed",
            path.len(),
            path.crossings(),
            path.consumed
        );

        Some(path)
    }

    /// Reserve the perpendicular pair of nodes at a crossing taken from below.
    fn reserve_over(&mut self, node: Node) {
        let above = node.with_dir(node.dir.glance());
        if !self.graph.is_unused(above) {
            return;
        }

        self.pending.insert(above);
        let opposite = above.with_dir(above.dir.cross());
        if self.graph.is_unused(opposite) {
            self.pending.insert(opposite);
        }
    }

    fn spend(&mut self, node: Node) -> usize {
        self.pending.remove(&node);
        usize::from(self.graph.consume(node))
    }

    /// Node the ribbon enters after leaving `mid` towards `junction`.
    fn continuation(&self, mid: Vec2, junction: Vec2, exit: Dir) -> Option<Node> {
        let clockwise = matches!(exit, Dir::FrontLeft | Dir::BackRight);
        let next_mid = self.graph.junction(junction)?.find_next(mid, clockwise);
        let candidate = Node::new(next_mid, if clockwise { Dir::FrontRight } else { Dir::BackRight });

        let enters_from_right = self
            .graph
            .crossing(next_mid)
            .is_some_and(|c| c.right == junction);

        let node = if self.graph.is_unused(candidate) && enters_from_right {
            candidate
        } else {
            candidate.with_dir(candidate.dir.cross())
        };

        self.graph.is_unused(node).then_some(node)
    }
}

impl Iterator for Tracer {
    type Item = ThreadPath;

    fn next(&mut self) -> Option<ThreadPath> {
        self.next_thread()
    }
}

/// Position and tangent of the ribbon as it leaves a midpoint through `exit`.
fn sample(mid: Vec2, crossing: &Crossing, exit: Dir, over: bool) -> ThreadSample {
    let normal = crossing.normal;
    let across = crossing.left - crossing.right;
    let front = if exit.is_front() { 1.0 } else { -1.0 };
    let left = if exit.is_left() { 1.0 } else { -1.0 };

    let (position, tangent) = match crossing.kind {
        StrokeType::Cross => {
            let turn = match exit {
                Dir::FrontLeft => FRAC_PI_4,
                Dir::BackLeft => 3.0 * FRAC_PI_4,
                Dir::BackRight => -3.0 * FRAC_PI_4,
                Dir::FrontRight => -FRAC_PI_4,
            };
            let tangent = Vec2::from_angle(normal.angle() + turn) * (normal.length() * CROSS_TANGENT_SCALE);
            (mid, tangent)
        }
        StrokeType::Glance => (
            mid + normal * (front * TURN_OFFSET),
            across * (left * TURN_TANGENT_SCALE),
        ),
        StrokeType::Bounce => (
            mid + across * (left * TURN_OFFSET),
            normal * (front * TURN_TANGENT_SCALE),
        ),
    };

    ThreadSample { position, tangent, over, kind: crossing.kind }
}

/// Trace a stroke list into closed threads.
///
/// Never fails. Degenerate input (zero-length strokes, junctions with a
/// single stroke) gives degenerate threads; use [`try_trace`] to reject it.
pub fn trace(strokes: &[Stroke]) -> Art {
    let mut threads = Vec::new();
    let mut zs = Vec::new();

    for path in Tracer::new(strokes) {
        let (thread, z) = path.into_curves();
        threads.push(thread);
        zs.push(z);
    }

    log::info!("traced {} strokes into {} threads", strokes.len(), threads.len());
    Art::new(threads, zs)
}

/// [`validate_strokes`], then [`trace`].
pub fn try_trace(strokes: &[Stroke]) -> Result<Art, KnotError> {
    validate_strokes(strokes)?;
    Ok(trace(strokes))
}

/// Reject input the tracer would turn into degenerate threads.
///
/// Checks, in order: every coordinate is finite, no stroke has zero length,
/// every junction has at least two incident strokes.
pub fn validate_strokes(strokes: &[Stroke]) -> Result<(), KnotError> {
    let mut degree: BTreeMap<Vec2, usize> = BTreeMap::new();

    for (index, stroke) in strokes.iter().enumerate() {
        if !stroke.a.is_finite() || !stroke.b.is_finite() {
            return Err(KnotError::NonFiniteStroke { index });
        }
        if stroke.a == stroke.b {
            return Err(KnotError::ZeroLengthStroke { index, at: stroke.a });
        }
        *degree.entry(stroke.a).or_default() += 1;
        *degree.entry(stroke.b).or_default() += 1;
    }

    match degree.into_iter().find(|&(_, d)| d < 2) {
        Some((at, degree)) => Err(KnotError::DanglingJunction { at, degree }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{generate_grid, GridConfig};
    use crate::spline::Spline;
    use approx::assert_relative_eq;

    fn v(x: f64, y: f64) -> Vec2 {
        Vec2::new(x, y)
    }

    fn square(kind: StrokeType) -> Vec<Stroke> {
        vec![
            Stroke::with_kind(v(0.0, 0.0), v(1.0, 0.0), kind),
            Stroke::with_kind(v(1.0, 0.0), v(1.0, 1.0), kind),
            Stroke::with_kind(v(1.0, 1.0), v(0.0, 1.0), kind),
            Stroke::with_kind(v(0.0, 1.0), v(0.0, 0.0), kind),
        ]
    }

    /// Lattice of `n x n` cells, all strokes `Cross`.
    fn lattice(n: usize) -> Vec<Stroke> {
        let mut strokes = Vec::new();
        for i in 0..=n {
            for j in 0..n {
                let (a, b) = (i as f64, j as f64);
                strokes.push(Stroke::new(v(b, a), v(b + 1.0, a)));
                strokes.push(Stroke::new(v(a, b), v(a, b + 1.0)));
            }
        }
        strokes
    }

    fn paths(strokes: &[Stroke]) -> Vec<ThreadPath> {
        Tracer::new(strokes).collect()
    }

    fn assert_alternates(path: &ThreadPath) {
        for pair in path.samples.windows(2) {
            let toggled = pair[0].kind == StrokeType::Cross;
            assert_eq!(pair[1].over, pair[0].over ^ toggled, "broken alternation in {:?}", path);
        }
    }

    #[test]
    fn empty_input_has_no_threads() {
        let art = trace(&[]);
        assert_eq!(art.thread_count(), 0);
        assert!(Tracer::new(&[]).is_finished());
    }

    #[test]
    fn single_stroke_goes_under_then_over() {
        let paths = paths(&[Stroke::new(v(0.0, 0.0), v(1.0, 0.0))]);

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 2);
        assert_eq!(paths[0].consumed, 4);
        assert!(!paths[0].samples[0].over);
        assert!(paths[0].samples[1].over);
    }

    #[test]
    fn cross_square_gives_two_interlaced_loops() {
        let paths = paths(&square(StrokeType::Cross));

        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert_eq!(path.len(), 4);
            assert_eq!(path.consumed, 8);
            assert_alternates(path);
        }
        // The first loop starts under, the second starts over.
        assert!(!paths[0].samples[0].over);
        assert!(paths[1].samples[0].over);
    }

    #[test]
    fn bounce_pair_never_toggles() {
        let strokes = vec![
            Stroke::with_kind(v(0.0, 0.0), v(1.0, 0.0), StrokeType::Bounce),
            Stroke::with_kind(v(1.0, 0.0), v(2.0, 0.0), StrokeType::Bounce),
        ];
        let paths = paths(&strokes);

        let lengths: Vec<usize> = paths.iter().map(|p| p.len()).collect();
        assert_eq!(lengths, vec![1, 2, 1]);
        assert!(paths.iter().flat_map(|p| &p.samples).all(|s| !s.over));
        assert_eq!(paths.iter().map(|p| p.consumed).sum::<usize>(), 8);
    }

    #[test]
    fn mixed_square_follows_turn_rules() {
        use StrokeType::{Bounce, Cross, Glance};

        let strokes = vec![
            Stroke::with_kind(v(0.0, 0.0), v(1.0, 0.0), Glance),
            Stroke::with_kind(v(1.0, 0.0), v(1.0, 1.0), Bounce),
            Stroke::with_kind(v(1.0, 1.0), v(0.0, 1.0), Cross),
            Stroke::with_kind(v(0.0, 1.0), v(0.0, 0.0), Cross),
        ];
        let paths = paths(&strokes);

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].consumed, 16);

        let expected = [
            (v(0.0, 0.5), false, Cross),
            (v(0.5, -0.25), true, Glance),
            (v(1.0, 0.25), true, Bounce),
            (v(0.5, 0.25), true, Glance),
            (v(0.0, 0.5), true, Cross),
            (v(0.5, 1.0), false, Cross),
            (v(1.0, 0.75), true, Bounce),
            (v(0.5, 1.0), true, Cross),
        ];
        let actual: Vec<_> = paths[0].samples.iter().map(|s| (s.position, s.over, s.kind)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn lattice_conserves_nodes_and_alternates() {
        let strokes = lattice(2);
        let paths = paths(&strokes);

        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| p.len() == 8));
        assert_eq!(paths.iter().map(|p| p.consumed).sum::<usize>(), 4 * strokes.len());
        paths.iter().for_each(assert_alternates);
    }

    #[test]
    fn threads_are_closed() {
        let art = trace(&lattice(3));
        assert!(art.thread_count() > 0);

        for (thread, z) in art.iter() {
            let (start, end) = thread.domain();
            assert_eq!(thread.y(start), thread.y(end));
            assert_eq!(z.y(start), z.y(end));

            let before = thread.y(end - 1e-9);
            let after = thread.y(start - 1e-9);
            assert_relative_eq!(before.x, after.x, epsilon = 1e-6);
            assert_relative_eq!(before.y, after.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn curves_pass_through_samples() {
        let strokes = square(StrokeType::Cross);
        let path = paths(&strokes).remove(0);
        let samples = path.samples.clone();
        let (thread, z) = path.into_curves();

        assert_eq!(thread.knot_count(), samples.len() + 1);
        for (i, s) in samples.iter().enumerate() {
            let t = i as f64 / samples.len() as f64;
            assert_eq!(thread.y(t), s.position);
            assert_eq!(z.y(t) > 0.0, s.over);
        }
    }

    #[test]
    fn cross_tangent_is_rotated_and_scaled() {
        let crossing = Crossing {
            kind: StrokeType::Cross,
            normal: v(0.0, 2.0),
            left: v(0.0, 0.0),
            right: v(2.0, 0.0),
        };
        let s = sample(v(1.0, 0.0), &crossing, Dir::FrontLeft, false);

        assert_eq!(s.position, v(1.0, 0.0));
        assert_relative_eq!(s.tangent.length(), 2.6, epsilon = 1e-12);
        assert_relative_eq!(s.tangent.angle(), 3.0 * FRAC_PI_4, epsilon = 1e-12);
    }

    #[test]
    fn turn_samples_are_offset() {
        let mut crossing = Crossing {
            kind: StrokeType::Glance,
            normal: v(0.0, 2.0),
            left: v(0.0, 0.0),
            right: v(2.0, 0.0),
        };
        let glance = sample(v(1.0, 0.0), &crossing, Dir::BackRight, false);
        assert_eq!(glance.position, v(1.0, -0.5));
        assert_relative_eq!(glance.tangent.x, 0.6, epsilon = 1e-12);

        crossing.kind = StrokeType::Bounce;
        let bounce = sample(v(1.0, 0.0), &crossing, Dir::FrontLeft, true);
        assert_eq!(bounce.position, v(0.5, 0.0));
        assert_relative_eq!(bounce.tangent.y, 0.6, epsilon = 1e-12);
        assert!(bounce.over);
    }

    #[test]
    fn pending_stays_within_unused() {
        let mut tracer = Tracer::new(&lattice(3));
        while tracer.next_thread().is_some() {
            for node in tracer.pending() {
                assert!(tracer.graph().is_unused(*node));
            }
        }
        assert!(tracer.is_finished());
    }

    #[test]
    fn random_grids_hold_invariants() {
        let config = GridConfig::default().with_size(1.5, 1.0);
        for seed in 0..20 {
            let strokes = generate_grid(&config, seed);
            let paths = paths(&strokes);

            assert_eq!(paths.iter().map(|p| p.consumed).sum::<usize>(), 4 * strokes.len());
            assert!(paths.len() <= 4 * strokes.len().max(1));
            paths.iter().for_each(assert_alternates);
            assert!(validate_strokes(&strokes).is_ok(), "seed {seed}");
        }
    }

    #[test]
    fn validation_rejects_degenerate_input() {
        let zero = [Stroke::new(v(1.0, 1.0), v(1.0, 1.0))];
        assert!(matches!(validate_strokes(&zero), Err(KnotError::ZeroLengthStroke { index: 0, .. })));

        let nan = [Stroke::new(v(f64::NAN, 0.0), v(1.0, 0.0))];
        assert!(matches!(validate_strokes(&nan), Err(KnotError::NonFiniteStroke { index: 0 })));

        let dangling = [Stroke::new(v(0.0, 0.0), v(1.0, 0.0))];
        assert!(matches!(
            try_trace(&dangling),
            Err(KnotError::DanglingJunction { degree: 1, .. })
        ));

        assert!(try_trace(&square(StrokeType::Cross)).is_ok());
        assert!(validate_strokes(&[]).is_ok());
    }
}
