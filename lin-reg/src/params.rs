use common::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::{
    BatchGradientDescent, OptimizationMethod, RegularizationKind, Regularizer,
    StochasticGradientDescent,
};

/// The hyperparameters of a sparse least squares model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Update rule used by batch training
    pub method: OptimizationMethod,
    /// Step size α, must be positive
    pub learning_rate: f64,
    /// Penalty strength λ, 0.0 disables regularization
    pub regularization: f64,
    /// Which penalty λ scales
    pub regularization_kind: RegularizationKind,
    /// Number of passes over the dataset in batch training
    pub max_iterations: usize,
    /// Declared number of features, θ has one more entry for the bias
    pub features: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            method: OptimizationMethod::Batch,
            learning_rate: 0.01,
            regularization: 0.0,
            regularization_kind: RegularizationKind::None,
            max_iterations: 1000,
            features: 1,
        }
    }
}

impl Params {
    /// Check that the hyperparameters can be trained with
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::Configuration(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !self.regularization.is_finite() || self.regularization < 0.0 {
            return Err(Error::Configuration(format!(
                "regularization strength must not be negative, got {}",
                self.regularization
            )));
        }
        if self.features == 0 {
            return Err(Error::Configuration(
                "a model needs at least one feature".to_string(),
            ));
        }
        if self.features.checked_add(1).is_none() {
            return Err(Error::Configuration(format!(
                "{} features leave no room for the bias",
                self.features
            )));
        }

        Ok(())
    }

    /// The penalty described by `regularization` and `regularization_kind`
    #[inline(always)]
    pub fn regularizer(&self) -> Regularizer {
        Regularizer::new(self.regularization_kind, self.regularization)
    }

    pub(crate) fn batch_rule(&self) -> BatchGradientDescent {
        BatchGradientDescent {
            learning_rate: self.learning_rate,
            regularizer: self.regularizer(),
        }
    }

    pub(crate) fn stochastic_rule(&self) -> StochasticGradientDescent {
        StochasticGradientDescent {
            learning_rate: self.learning_rate,
            regularizer: self.regularizer(),
        }
    }
}
