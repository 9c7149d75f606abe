use std::{fmt, str::FromStr};

use common::Error;
use serde::{Deserialize, Serialize};

/// How the parameters are updated during batch training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OptimizationMethod {
    /// One update per pass, using the mean gradient of the whole dataset
    #[default]
    Batch,
    /// One update per example, in dataset order
    Stochastic,
}

impl FromStr for OptimizationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch" | "batchgd" | "batch_gd" => Ok(Self::Batch),
            "stochastic" | "stochasticgd" | "stochastic_gd" | "sgd" => Ok(Self::Stochastic),
            other => Err(Error::Configuration(format!(
                "unrecognized optimization method {:?}, expected batch or stochastic",
                other
            ))),
        }
    }
}

impl TryFrom<String> for OptimizationMethod {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OptimizationMethod> for String {
    fn from(method: OptimizationMethod) -> Self {
        method.to_string()
    }
}

impl fmt::Display for OptimizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationMethod::Batch => write!(f, "batch"),
            OptimizationMethod::Stochastic => write!(f, "stochastic"),
        }
    }
}
