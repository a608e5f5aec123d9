//! Error type for fallible knotwork operations.
//!
//! Contract violations (too few spline knots, out of range art access) panic
//! instead; these variants cover input that comes from outside the program.

use crate::geometry::Vec2;

#[derive(Debug, thiserror::Error)]
pub enum KnotError {
    #[error("stroke {index} has zero length at {at}")]
    ZeroLengthStroke { index: usize, at: Vec2 },

    #[error("junction at {at} has {degree} incident stroke(s); at least 2 are required")]
    DanglingJunction { at: Vec2, degree: usize },

    #[error("stroke {index} has a non-finite coordinate")]
    NonFiniteStroke { index: usize },

    #[error("XML parse error at position {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("invalid `{attribute}` attribute on <{element}>: {message}")]
    Attribute {
        element: String,
        attribute: String,
        message: String,
    },

    #[error("unknown stroke type `{0}` (expected cross, bounce or glance)")]
    UnknownStrokeType(String),

    #[error("no strokes found in SVG")]
    NoStrokes,
}
