//! Sparse linear least squares trained by gradient descent, either in batch
//! over a stored dataset or online from a stream of datapoints.

#[macro_use]
extern crate log;

use common::{Datapoint, Result};
use nalgebra::DVector;

mod gradient;
mod hypothesis;
mod method;
mod online;
mod parameters;
mod params;
mod regularizer;
mod sparse_least_squares;

pub use gradient::{cost, BatchGradientDescent, StochasticGradientDescent};
pub use hypothesis::{hypothesis, hypothesis_dense};
pub use method::OptimizationMethod;
pub use online::OnlineLearner;
pub use parameters::{ParameterWriter, SharedParameters};
pub use params::Params;
pub use regularizer::{RegularizationKind, Regularizer};
pub use sparse_least_squares::SparseLeastSquares;

/// Output dimensionality of least squares models
pub const OUTPUT_DIM: usize = 1;

/// A single gradient descent step over the parameter vector
pub trait UpdateRule: Clone {
    /// Move θ according to the given examples
    ///
    /// # Parameters
    /// theta: Parameters with the bias at index 0
    /// batch: The examples to learn from, each label of length [`OUTPUT_DIM`]
    fn step(&self, theta: &mut DVector<f64>, batch: &[Datapoint]) -> Result<()>;
}
