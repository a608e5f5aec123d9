//! Stroke graph: junctions and directional nodes.
//!
//! Every stroke contributes four [`Node`]s at its midpoint, one per approach
//! [`Dir`]ection, and registers its midpoint with the [`Junction`]s at both
//! endpoints. Junctions keep their midpoints sorted by angle so the tracer can
//! ask for the next stroke clockwise or counter-clockwise.
//!
//! Junctions live in a map keyed by position and nodes refer to them by that
//! position, so nothing in the graph borrows anything else.
//!
//! The graph does not validate its input. Zero-length strokes or junctions
//! with a single stroke produce degenerate threads; see
//! [`crate::trace::validate_strokes`] for an opt-in check.

use std::collections::{BTreeMap, BTreeSet};

use crate::geometry::{Stroke, StrokeType, Vec2};

/// Direction a ribbon approaches (or leaves) a stroke midpoint from.
///
/// Front/back is relative to the stroke normal, left/right names the
/// junction (`a` is left, `b` is right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dir {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::FrontLeft, Dir::FrontRight, Dir::BackLeft, Dir::BackRight];

    /// Reflect front/back, keep the side.
    pub fn bounce(self) -> Dir {
        match self {
            Dir::FrontLeft => Dir::BackLeft,
            Dir::FrontRight => Dir::BackRight,
            Dir::BackLeft => Dir::FrontLeft,
            Dir::BackRight => Dir::FrontRight,
        }
    }

    /// Reflect front/back and swap the side.
    pub fn cross(self) -> Dir {
        match self {
            Dir::FrontLeft => Dir::BackRight,
            Dir::FrontRight => Dir::BackLeft,
            Dir::BackLeft => Dir::FrontRight,
            Dir::BackRight => Dir::FrontLeft,
        }
    }

    /// Swap the side, keep front/back.
    pub fn glance(self) -> Dir {
        match self {
            Dir::FrontLeft => Dir::FrontRight,
            Dir::FrontRight => Dir::FrontLeft,
            Dir::BackLeft => Dir::BackRight,
            Dir::BackRight => Dir::BackLeft,
        }
    }

    /// Exit direction for a ribbon entering from `self` through a stroke of `kind`.
    pub fn exit(self, kind: StrokeType) -> Dir {
        match kind {
            StrokeType::Bounce => self.bounce(),
            StrokeType::Cross => self.cross(),
            StrokeType::Glance => self.glance(),
        }
    }

    #[inline]
    pub fn is_front(self) -> bool {
        matches!(self, Dir::FrontLeft | Dir::FrontRight)
    }

    #[inline]
    pub fn is_left(self) -> bool {
        matches!(self, Dir::FrontLeft | Dir::BackLeft)
    }
}

/// A directional state at one stroke midpoint.
///
/// Orders by midpoint, then direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Node {
    pub mid: Vec2,
    pub dir: Dir,
}

impl Node {
    #[inline]
    pub fn new(mid: Vec2, dir: Dir) -> Self {
        Self { mid, dir }
    }

    #[inline]
    pub fn with_dir(self, dir: Dir) -> Self {
        Self { dir, ..self }
    }
}

/// Per-stroke data shared by the four nodes at its midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub kind: StrokeType,
    /// Perpendicular to the stroke, as long as the stroke.
    pub normal: Vec2,
    /// Position of the junction at stroke end `a`.
    pub left: Vec2,
    /// Position of the junction at stroke end `b`.
    pub right: Vec2,
}

impl Crossing {
    /// Junction on the given side of the stroke.
    #[inline]
    pub fn junction(&self, left: bool) -> Vec2 {
        if left { self.left } else { self.right }
    }
}

/// All strokes meeting at one position.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    position: Vec2,
    mids: Vec<Vec2>,
}

impl Junction {
    fn new(position: Vec2) -> Self {
        Self { position, mids: Vec::new() }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Midpoints of incident strokes, sorted by angle around the junction.
    #[inline]
    pub fn mids(&self) -> &[Vec2] {
        &self.mids
    }

    /// Number of incident strokes.
    #[inline]
    pub fn degree(&self) -> usize {
        self.mids.len()
    }

    /// The midpoint following `mid` around the junction.
    ///
    /// `clockwise` walks in increasing angle (clockwise on a y-down canvas),
    /// otherwise decreasing. The list is cyclic. A midpoint that does not
    /// belong to this junction is returned unchanged.
    pub fn find_next(&self, mid: Vec2, clockwise: bool) -> Vec2 {
        let Some(index) = self.mids.iter().position(|m| *m == mid) else {
            return mid;
        };

        let len = self.mids.len();
        let next = if clockwise { (index + 1) % len } else { (index + len - 1) % len };
        self.mids[next]
    }

    fn sort_by_angle(&mut self) {
        let origin = self.position;
        // Stable, so strokes leaving at the same angle keep insertion order.
        self.mids.sort_by(|a, b| (*a - origin).angle().total_cmp(&(*b - origin).angle()));
    }
}

/// Junction index plus the set of directional nodes not yet traced.
#[derive(Debug, Clone)]
pub struct Graph {
    junctions: BTreeMap<Vec2, Junction>,
    crossings: BTreeMap<Vec2, Crossing>,
    unused: BTreeSet<Node>,
}

impl Graph {
    /// Build the graph. Stroke order does not matter.
    ///
    /// Strokes that share a midpoint collapse onto the first one.
    pub fn new(strokes: &[Stroke]) -> Self {
        let mut junctions: BTreeMap<Vec2, Junction> = BTreeMap::new();
        let mut crossings = BTreeMap::new();
        let mut unused = BTreeSet::new();

        for stroke in strokes {
            let mid = stroke.midpoint();

            for end in [stroke.a, stroke.b] {
                junctions
                    .entry(end)
                    .or_insert_with(|| Junction::new(end))
                    .mids
                    .push(mid);
            }

            crossings.entry(mid).or_insert(Crossing {
                kind: stroke.kind,
                normal: stroke.normal(),
                left: stroke.a,
                right: stroke.b,
            });

            unused.extend(Dir::ALL.iter().map(|&dir| Node::new(mid, dir)));
        }

        for junction in junctions.values_mut() {
            junction.sort_by_angle();
        }

        log::debug!(
            "stroke graph: {} strokes, {} junctions, {} nodes",
            strokes.len(),
            junctions.len(),
            unused.len()
        );

        Self { junctions, crossings, unused }
    }

    #[inline]
    pub fn junction(&self, position: Vec2) -> Option<&Junction> {
        self.junctions.get(&position)
    }

    pub fn junctions(&self) -> impl Iterator<Item = &Junction> {
        self.junctions.values()
    }

    #[inline]
    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    /// Stroke data at a midpoint.
    #[inline]
    pub fn crossing(&self, mid: Vec2) -> Option<&Crossing> {
        self.crossings.get(&mid)
    }

    #[inline]
    pub fn is_unused(&self, node: Node) -> bool {
        self.unused.contains(&node)
    }

    #[inline]
    pub fn unused_count(&self) -> usize {
        self.unused.len()
    }

    /// Smallest unused node.
    #[inline]
    pub fn first_unused(&self) -> Option<Node> {
        self.unused.first().copied()
    }

    /// Mark a node consumed. Returns false if it already was.
    #[inline]
    pub fn consume(&mut self, node: Node) -> bool {
        self.unused.remove(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vec2 {
        Vec2::new(x, y)
    }

    fn plus() -> Vec<Stroke> {
        // Four strokes meeting at the origin.
        vec![
            Stroke::new(v(0.0, 0.0), v(2.0, 0.0)),
            Stroke::new(v(0.0, 0.0), v(0.0, 2.0)),
            Stroke::new(v(-2.0, 0.0), v(0.0, 0.0)),
            Stroke::new(v(0.0, -2.0), v(0.0, 0.0)),
        ]
    }

    #[test]
    fn direction_rules_are_involutions() {
        for dir in Dir::ALL {
            assert_eq!(dir.bounce().bounce(), dir);
            assert_eq!(dir.cross().cross(), dir);
            assert_eq!(dir.glance().glance(), dir);
        }
    }

    #[test]
    fn direction_rules_flip_the_right_halves() {
        for dir in Dir::ALL {
            assert_ne!(dir.bounce().is_front(), dir.is_front());
            assert_eq!(dir.bounce().is_left(), dir.is_left());

            assert_ne!(dir.cross().is_front(), dir.is_front());
            assert_ne!(dir.cross().is_left(), dir.is_left());

            assert_eq!(dir.glance().is_front(), dir.is_front());
            assert_ne!(dir.glance().is_left(), dir.is_left());
        }
    }

    #[test]
    fn exit_dispatches_on_kind() {
        let d = Dir::FrontLeft;
        assert_eq!(d.exit(StrokeType::Bounce), Dir::BackLeft);
        assert_eq!(d.exit(StrokeType::Cross), Dir::BackRight);
        assert_eq!(d.exit(StrokeType::Glance), Dir::FrontRight);
    }

    #[test]
    fn four_nodes_per_stroke() {
        let graph = Graph::new(&plus());
        assert_eq!(graph.unused_count(), 16);
        assert_eq!(graph.junction_count(), 5);
        assert!(graph.is_unused(Node::new(v(1.0, 0.0), Dir::BackRight)));
    }

    #[test]
    fn junction_sorts_by_angle() {
        let graph = Graph::new(&plus());
        let center = graph.junction(v(0.0, 0.0)).unwrap();

        assert_eq!(center.degree(), 4);
        assert_eq!(center.mids(), &[v(-1.0, 0.0), v(0.0, -1.0), v(1.0, 0.0), v(0.0, 1.0)]);
    }

    #[test]
    fn find_next_cycles_both_ways() {
        let graph = Graph::new(&plus());
        let center = graph.junction(v(0.0, 0.0)).unwrap();

        assert_eq!(center.find_next(v(1.0, 0.0), true), v(0.0, 1.0));
        assert_eq!(center.find_next(v(0.0, 1.0), true), v(-1.0, 0.0));
        assert_eq!(center.find_next(v(-1.0, 0.0), false), v(0.0, 1.0));
        assert_eq!(center.find_next(v(5.0, 5.0), true), v(5.0, 5.0));
    }

    #[test]
    fn crossing_keeps_orientation() {
        let graph = Graph::new(&[Stroke::with_kind(v(0.0, 0.0), v(0.0, 2.0), StrokeType::Glance)]);
        let crossing = graph.crossing(v(0.0, 1.0)).unwrap();

        assert_eq!(crossing.kind, StrokeType::Glance);
        assert_eq!(crossing.normal, v(-2.0, 0.0));
        assert_eq!(crossing.junction(true), v(0.0, 0.0));
        assert_eq!(crossing.junction(false), v(0.0, 2.0));
    }

    #[test]
    fn duplicate_strokes_share_nodes() {
        let s = Stroke::new(v(0.0, 0.0), v(1.0, 0.0));
        let graph = Graph::new(&[s, s]);
        assert_eq!(graph.unused_count(), 4);
    }

    #[test]
    fn consume_only_once() {
        let mut graph = Graph::new(&plus());
        let node = graph.first_unused().unwrap();

        assert!(graph.consume(node));
        assert!(!graph.consume(node));
        assert_eq!(graph.unused_count(), 15);
    }

    #[test]
    fn empty_graph() {
        let graph = Graph::new(&[]);
        assert_eq!(graph.unused_count(), 0);
        assert!(graph.first_unused().is_none());
    }
}
