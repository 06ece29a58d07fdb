use crate::error::{HematiteError, Result};

/// Half squared error, the loss the gradient-descent update is derived from.
pub struct SquaredError;

impl SquaredError {
    /// Per-component scalar: 0.5 · (expected − predicted)²
    pub fn loss(predicted: f64, expected: f64) -> f64 {
        0.5 * (expected - predicted).powi(2)
    }

    /// Per-component gradient with respect to the prediction:
    /// predicted − expected.
    ///
    /// The backward pass feeds this straight into the descent step, so the
    /// argument order is load-bearing: pass the produced output first.
    pub fn derivative(predicted: f64, expected: f64) -> f64 {
        predicted - expected
    }

    /// Sum of per-component losses over a full output vector.
    pub fn total(predicted: &[f64], expected: &[f64]) -> Result<f64> {
        if predicted.len() != expected.len() {
            return Err(HematiteError::DimensionMismatch {
                expected: expected.len(),
                actual: predicted.len(),
            });
        }
        Ok(predicted.iter().zip(expected.iter())
            .map(|(p, e)| SquaredError::loss(*p, *e))
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_component_loss_is_half_squared_difference() {
        assert_eq!(SquaredError::loss(0.0, 1.0), 0.5);
        assert_eq!(SquaredError::loss(1.0, 0.0), 0.5);
        assert_eq!(SquaredError::loss(0.25, 0.75), 0.125);
    }

    #[test]
    fn derivative_is_prediction_minus_expectation() {
        assert_eq!(SquaredError::derivative(0.9, 0.4), 0.5);
        assert_eq!(SquaredError::derivative(0.4, 0.9), -0.5);
    }

    #[test]
    fn total_sums_over_components() {
        let total = SquaredError::total(&[0.0, 1.0], &[1.0, 1.0]).unwrap();
        assert_eq!(total, 0.5);
    }

    #[test]
    fn total_rejects_mismatched_lengths() {
        let err = SquaredError::total(&[0.1, 0.2], &[0.1, 0.2, 0.3]).unwrap_err();
        assert!(matches!(
            err,
            HematiteError::DimensionMismatch { expected: 3, actual: 2 }
        ));
    }
}
