use std::marker::PhantomData;

use super::blend::{self, Blend};
use super::{Knots, Sample, Spline};

/// Spline that only looks at the two knots around `x`.
#[derive(Debug, Clone)]
pub struct LocalSpline<B, S> {
    knots: Knots<S>,
    blend: PhantomData<B>,
}

pub type LinearSpline<S> = LocalSpline<blend::Linear, S>;
pub type CosineSpline<S> = LocalSpline<blend::Cosine, S>;
pub type StepSpline<S> = LocalSpline<blend::Step, S>;
pub type LateStepSpline<S> = LocalSpline<blend::LateStep, S>;
pub type SmoothStepSpline<S> = LocalSpline<blend::SmoothStep, S>;
pub type AccelSpline<S> = LocalSpline<blend::Accel, S>;
pub type DecelSpline<S> = LocalSpline<blend::Decel, S>;

impl<B: Blend, S: Sample> LocalSpline<B, S> {
    /// See [`Knots::new`] for the contract on `xs` and `ys`.
    pub fn new(xs: Vec<f64>, ys: Vec<S>, looping: bool) -> Self {
        Self { knots: Knots::new(xs, ys, looping), blend: PhantomData }
    }
}

impl<B: Blend, S: Sample> Spline<S> for LocalSpline<B, S> {
    fn knots(&self) -> &Knots<S> {
        &self.knots
    }

    fn y(&self, x: f64) -> S {
        let (i, t) = self.knots.locate(x);
        let i = i as isize;
        B::blend(self.knots.y_at(i), self.knots.y_at(i + 1), t)
    }
}
