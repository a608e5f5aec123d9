//! # knotwork
//!
//! Celtic knot geometry from planar stroke graphs.
//!
//! A knot starts as a list of straight [`Stroke`]s. Every stroke midpoint is a
//! place where a ribbon crosses, bounces or glances. [`trace`] decomposes the
//! stroke graph into closed threads with alternating over/under crossings and
//! returns them as an [`Art`]: one smooth [`Thread`] curve and one step-valued
//! [`Z`] curve per ribbon.
//!
//! ```
//! use knotwork::{trace, Stroke, Vec2};
//!
//! let v = Vec2::new;
//! let square = [
//!     Stroke::new(v(0.0, 0.0), v(1.0, 0.0)),
//!     Stroke::new(v(1.0, 0.0), v(1.0, 1.0)),
//!     Stroke::new(v(1.0, 1.0), v(0.0, 1.0)),
//!     Stroke::new(v(0.0, 1.0), v(0.0, 0.0)),
//! ];
//! let art = trace(&square);
//! assert_eq!(art.thread_count(), 2);
//! ```
//!
//! Around that core sit a random [`grid`] generator, [`ribbon`] sampling for
//! renderers and [`svg`] import/export.

pub mod art;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod grid;
pub mod ribbon;
pub mod spline;
pub mod svg;
pub mod trace;

// Re-export common types at crate root for convenience.
pub use art::{Art, Thread, Z};
pub use error::KnotError;
pub use geometry::{Stroke, StrokeList, StrokeType, Vec2};
pub use grid::{generate_grid, GridConfig};
pub use ribbon::{ribbons, Ribbon, RibbonConfig};
pub use spline::Spline;
pub use svg::{art_to_svg, extract_strokes_from_svg, SvgStyle};
pub use trace::{trace, try_trace, validate_strokes, Tracer};
