use std::{fmt, str::FromStr};

use common::Error;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// The kind of penalty applied to the parameters during training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RegularizationKind {
    /// No penalty
    #[default]
    None,
    /// Lasso, λ * Σ|θ|
    L1,
    /// Ridge, λ/2 * Σθ²
    L2,
}

impl FromStr for RegularizationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "l1" | "lasso" => Ok(Self::L1),
            "l2" | "ridge" => Ok(Self::L2),
            other => Err(Error::Configuration(format!(
                "unrecognized regularization kind {:?}, expected one of none, l1, l2",
                other
            ))),
        }
    }
}

impl TryFrom<String> for RegularizationKind {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RegularizationKind> for String {
    fn from(kind: RegularizationKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for RegularizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RegularizationKind::None => "none",
            RegularizationKind::L1 => "l1",
            RegularizationKind::L2 => "l2",
        };
        write!(f, "{}", s)
    }
}

/// Penalty term added to the gradient of every parameter except the bias
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regularizer {
    /// Which penalty to apply
    pub kind: RegularizationKind,
    /// λ, 0.0 disables the penalty
    pub strength: f64,
}

impl Regularizer {
    /// Create a new regularizer
    pub fn new(kind: RegularizationKind, strength: f64) -> Self {
        Self { kind, strength }
    }

    /// A regularizer that never contributes
    pub fn none() -> Self {
        Self::new(RegularizationKind::None, 0.0)
    }

    /// Whether the regularizer contributes anything at all
    #[inline(always)]
    pub fn is_active(&self) -> bool {
        self.kind != RegularizationKind::None && self.strength > 0.0
    }

    /// Gradient of the penalty with respect to a single (non-bias) parameter
    #[inline]
    pub fn gradient(&self, theta_j: f64) -> f64 {
        match self.kind {
            RegularizationKind::None => 0.0,
            RegularizationKind::L1 => self.strength * sign(theta_j),
            RegularizationKind::L2 => self.strength * theta_j,
        }
    }

    /// Value of the penalty for the whole parameter vector, bias excluded
    pub fn penalty(&self, theta: &DVector<f64>) -> f64 {
        let weights = theta.iter().skip(1);
        match self.kind {
            RegularizationKind::None => 0.0,
            RegularizationKind::L1 => self.strength * weights.map(|t| t.abs()).sum::<f64>(),
            RegularizationKind::L2 => 0.5 * self.strength * weights.map(|t| t * t).sum::<f64>(),
        }
    }
}

impl Default for Regularizer {
    fn default() -> Self {
        Self::none()
    }
}

// f64::signum maps 0.0 to 1.0, the subgradient of |θ| at 0 is taken as 0
#[inline(always)]
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradients() {
        let l1 = Regularizer::new(RegularizationKind::L1, 0.5);
        assert_eq!(l1.gradient(3.0), 0.5);
        assert_eq!(l1.gradient(-0.1), -0.5);
        assert_eq!(l1.gradient(0.0), 0.0);

        let l2 = Regularizer::new(RegularizationKind::L2, 0.5);
        assert_eq!(l2.gradient(3.0), 1.5);
        assert_eq!(l2.gradient(-2.0), -1.0);

        let none = Regularizer::new(RegularizationKind::None, 10.0);
        assert_eq!(none.gradient(3.0), 0.0);
        assert!(!none.is_active());
        assert!(!Regularizer::new(RegularizationKind::L2, 0.0).is_active());
    }

    #[test]
    fn penalty_skips_bias() {
        let theta = DVector::from_vec(vec![100.0, 1.0, -2.0]);
        assert_eq!(Regularizer::new(RegularizationKind::L1, 2.0).penalty(&theta), 6.0);
        assert_eq!(Regularizer::new(RegularizationKind::L2, 2.0).penalty(&theta), 5.0);
        assert_eq!(Regularizer::none().penalty(&theta), 0.0);
    }

    #[test]
    fn parse_kinds() {
        assert_eq!("L2".parse::<RegularizationKind>().unwrap(), RegularizationKind::L2);
        assert_eq!(" l1 ".parse::<RegularizationKind>().unwrap(), RegularizationKind::L1);
        assert_eq!("none".parse::<RegularizationKind>().unwrap(), RegularizationKind::None);
        assert!(matches!(
            "elastic".parse::<RegularizationKind>(),
            Err(Error::Configuration(_))
        ));
        assert_eq!(RegularizationKind::L1.to_string(), "l1");
    }
}
