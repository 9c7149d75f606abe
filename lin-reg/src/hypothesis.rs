use common::{Error, Result, SparseVector};
use nalgebra::DVector;

/// The linear hypothesis h(θ, x) = θ0 + Σ θ(i+1) * x(i)
///
/// Only the stored entries of `x` are visited, so the cost is proportional
/// to the number of non-zero features.
///
/// # Arguments:
/// theta: parameter vector, bias at index 0, length = features + 1
/// x: feature vector with dimension = features
pub fn hypothesis(theta: &DVector<f64>, x: &SparseVector) -> Result<f64> {
    let features = theta.len().saturating_sub(1);
    if x.dim() != features {
        return Err(Error::Dimension {
            expected: features,
            actual: x.dim(),
        });
    }

    Ok(x.iter().fold(theta[0], |acc, (i, v)| acc + theta[i + 1] * v))
}

/// Dense counterpart of [`hypothesis`], used for predictions on plain slices
pub fn hypothesis_dense(theta: &DVector<f64>, x: &[f64]) -> Result<f64> {
    let features = theta.len().saturating_sub(1);
    if x.len() != features {
        return Err(Error::Dimension {
            expected: features,
            actual: x.len(),
        });
    }

    Ok(x.iter()
        .zip(theta.iter().skip(1))
        .fold(theta[0], |acc, (x, t)| acc + x * t))
}

#[cfg(test)]
mod tests {
    use round::round;

    use super::*;

    #[test]
    fn bias_plus_dot_product() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let theta = DVector::from_vec(vec![1.0, 0.5, -2.0, 3.0]);
        let x = SparseVector::from(vec![2.0, 0.0, 0.1]);
        let h = hypothesis(&theta, &x).unwrap();
        info!("h: {}", h);

        assert_eq!(round(h, 6), 2.3);
        assert_eq!(round(hypothesis_dense(&theta, &[2.0, 0.0, 0.1]).unwrap(), 6), 2.3);
    }

    #[test]
    fn empty_features_yield_bias() {
        let theta = DVector::from_vec(vec![4.0, 1.0, 1.0]);
        assert_eq!(hypothesis(&theta, &SparseVector::new(2)).unwrap(), 4.0);
    }

    #[test]
    fn wrong_dimension_is_rejected() {
        let theta = DVector::from_vec(vec![0.0, 1.0]);
        assert!(matches!(
            hypothesis(&theta, &SparseVector::new(3)),
            Err(Error::Dimension {
                expected: 1,
                actual: 3
            })
        ));
        assert!(hypothesis_dense(&theta, &[]).is_err());
    }
}
