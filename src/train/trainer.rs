use crate::error::{HematiteError, Result};
use crate::network::network::Network;

/// Runs one ordered pass over a dataset, updating the network once per
/// `(input, target)` pair, and returns the mean total error.
pub fn train_epoch(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    rate: f64,
) -> Result<f64> {
    check_dataset(inputs, targets)?;

    let mut total_loss = 0.0;
    for (input, target) in inputs.iter().zip(targets.iter()) {
        total_loss += network.train(input, target, rate)?;
    }
    Ok(total_loss / inputs.len() as f64)
}

/// Shared dataset precondition: non-empty, one target per input.
pub(crate) fn check_dataset(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
    if inputs.is_empty() {
        return Err(HematiteError::InvalidDimension(
            "training set must not be empty".into(),
        ));
    }
    if inputs.len() != targets.len() {
        return Err(HematiteError::DimensionMismatch {
            expected: inputs.len(),
            actual: targets.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_net() -> Network {
        Network::from_parts(2, 2, 1, [0.0, 0.0], vec![0.1, 0.2, 0.3, 0.4], vec![0.2, 0.1])
            .unwrap()
    }

    #[test]
    fn mean_of_a_single_sample_equals_the_per_example_error() {
        let mut by_hand = small_net();
        let expected = by_hand.train(&[1.0, 0.0], &[1.0], 0.25).unwrap();

        let mut via_epoch = small_net();
        let mean =
            train_epoch(&mut via_epoch, &[vec![1.0, 0.0]], &[vec![1.0]], 0.25).unwrap();

        assert_eq!(mean, expected);
        assert_eq!(via_epoch, by_hand);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let mut net = small_net();
        assert!(train_epoch(&mut net, &[], &[], 0.25).is_err());
    }

    #[test]
    fn unpaired_dataset_is_rejected() {
        let mut net = small_net();
        let err = train_epoch(&mut net, &[vec![0.0, 0.0]], &[], 0.25).unwrap_err();
        assert!(matches!(
            err,
            HematiteError::DimensionMismatch { expected: 1, actual: 0 }
        ));
    }
}
