use common::{Datapoint, Error, Result};
use nalgebra::DVector;

use crate::{hypothesis, Regularizer, UpdateRule, OUTPUT_DIM};

/// Full batch gradient descent.
///
/// Each step computes the mean squared error gradient over every example,
/// adds the penalty gradient and moves θ once: θ := θ - α * ∇J(θ)
#[derive(Debug, Clone)]
pub struct BatchGradientDescent {
    /// Step size α
    pub learning_rate: f64,
    /// Penalty applied to all parameters but the bias
    pub regularizer: Regularizer,
}

impl UpdateRule for BatchGradientDescent {
    fn step(&self, theta: &mut DVector<f64>, batch: &[Datapoint]) -> Result<()> {
        if batch.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let mut gradient: DVector<f64> = DVector::zeros(theta.len());
        for dp in batch {
            let residual = hypothesis(theta, &dp.x)? - target(dp)?;
            gradient[0] += residual;
            for (i, v) in dp.x.iter() {
                gradient[i + 1] += residual * v;
            }
        }
        gradient /= batch.len() as f64;

        if self.regularizer.is_active() {
            for j in 1..theta.len() {
                gradient[j] += self.regularizer.gradient(theta[j]);
            }
        }

        theta.axpy(-self.learning_rate, &gradient, 1.0);

        Ok(())
    }
}

/// Stochastic gradient descent.
///
/// Every example of the batch moves θ on its own, in the order given.
/// The penalty gradient is applied at full strength per example, which makes
/// one pass descend the same objective as [`BatchGradientDescent`].
#[derive(Debug, Clone)]
pub struct StochasticGradientDescent {
    /// Step size α
    pub learning_rate: f64,
    /// Penalty applied to all parameters but the bias
    pub regularizer: Regularizer,
}

impl UpdateRule for StochasticGradientDescent {
    fn step(&self, theta: &mut DVector<f64>, batch: &[Datapoint]) -> Result<()> {
        for dp in batch {
            let residual = hypothesis(theta, &dp.x)? - target(dp)?;

            // penalty first, it must see θ before the data term moves it
            if self.regularizer.is_active() {
                for j in 1..theta.len() {
                    theta[j] -= self.learning_rate * self.regularizer.gradient(theta[j]);
                }
            }

            theta[0] -= self.learning_rate * residual;
            for (i, v) in dp.x.iter() {
                theta[i + 1] -= self.learning_rate * residual * v;
            }
        }

        Ok(())
    }
}

/// Regularized cost J(θ) = 1/(2N) Σ (h(x) - y)² + penalty(θ)
pub fn cost(theta: &DVector<f64>, data: &[Datapoint], regularizer: &Regularizer) -> Result<f64> {
    if data.is_empty() {
        return Err(Error::EmptyDataset);
    }
    let mut sum = 0.0;
    for dp in data {
        let residual = hypothesis(theta, &dp.x)? - target(dp)?;
        sum += residual * residual;
    }

    Ok(sum / (2.0 * data.len() as f64) + regularizer.penalty(theta))
}

#[inline]
fn target(dp: &Datapoint) -> Result<f64> {
    match dp.y.as_slice() {
        [y] => Ok(*y),
        other => Err(Error::DataShape(format!(
            "label has length {}, expected {}",
            other.len(),
            OUTPUT_DIM
        ))),
    }
}
