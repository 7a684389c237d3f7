// Library root: sport-agnostic scoring primitives shared by the domain crates.

pub mod formula;
pub mod normalize;

pub use formula::{evaluate, EvalError, Formula, StatRecord};
pub use normalize::{normalize, ScoreRange};
