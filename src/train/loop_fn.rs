use std::sync::atomic::Ordering;
use std::time::Instant;

use log::debug;
use rand::seq::SliceRandom;

use crate::error::Result;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::check_dataset;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns the mean loss of
/// the **last completed epoch**.
///
/// # Arguments
/// - `network` — mutable reference to the network; modified in place
/// - `inputs`  — training samples, each a `Vec<f64>` of the input dimension
/// - `targets` — corresponding targets, same length as `inputs`
/// - `config`  — hyperparameters, optional progress channel, optional stop flag
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<f64> {
    check_dataset(inputs, targets)?;

    let mut last_mean_loss = 0.0;

    for epoch in 1..=config.epochs {
        // Check stop flag at the top of each epoch.
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }

        let t_start = Instant::now();
        let mean_loss = run_one_epoch(
            network,
            inputs,
            targets,
            config.learning_rate,
            config.shuffle,
        )?;
        last_mean_loss = mean_loss;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;
        debug!(
            "epoch {epoch}/{}: mean loss {mean_loss:.6} ({elapsed_ms} ms)",
            config.epochs
        );

        if let Some(ref tx) = config.progress_tx {
            let stats = EpochStats {
                epoch,
                total_epochs: config.epochs,
                mean_loss,
                elapsed_ms,
            };
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }

        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }
    }

    Ok(last_mean_loss)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One full pass over the training data, optionally in shuffled order.
/// Returns the mean loss over all samples.
fn run_one_epoch(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    rate: f64,
    shuffle: bool,
) -> Result<f64> {
    let n = inputs.len();

    let mut indices: Vec<usize> = (0..n).collect();
    if shuffle {
        indices.shuffle(&mut rand::thread_rng());
    }

    let mut total_loss = 0.0;
    for &idx in &indices {
        total_loss += network.train(&inputs[idx], &targets[idx], rate)?;
    }
    Ok(total_loss / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::{Arc, mpsc};

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn or_dataset() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let inputs = vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ];
        let targets = vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]];
        (inputs, targets)
    }

    #[test]
    fn loop_reduces_loss_on_a_separable_dataset() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut net = Network::with_rng(2, 2, 1, &mut rng).unwrap();
        let (inputs, targets) = or_dataset();

        let mut config = TrainConfig::new(1, 0.5);
        config.shuffle = false;
        let first = train_loop(&mut net, &inputs, &targets, &config).unwrap();

        config.epochs = 500;
        let last = train_loop(&mut net, &inputs, &targets, &config).unwrap();

        assert!(
            last < first,
            "mean loss failed to decrease: started {first}, ended {last}"
        );
    }

    #[test]
    fn progress_channel_sees_every_epoch() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut net = Network::with_rng(2, 2, 1, &mut rng).unwrap();
        let (inputs, targets) = or_dataset();

        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(5, 0.1);
        config.progress_tx = Some(tx);

        train_loop(&mut net, &inputs, &targets, &config).unwrap();
        drop(config);

        let stats: Vec<EpochStats> = rx.iter().collect();
        assert_eq!(stats.len(), 5);
        assert_eq!(stats[0].epoch, 1);
        assert_eq!(stats[4].epoch, 5);
        assert!(stats.iter().all(|s| s.total_epochs == 5));
    }

    #[test]
    fn preset_stop_flag_prevents_any_update() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut net = Network::with_rng(2, 2, 1, &mut rng).unwrap();
        let before = net.clone();
        let (inputs, targets) = or_dataset();

        let mut config = TrainConfig::new(100, 0.5);
        config.stop_flag = Some(Arc::new(AtomicBool::new(true)));

        let mean = train_loop(&mut net, &inputs, &targets, &config).unwrap();
        assert_eq!(mean, 0.0);
        assert_eq!(net, before);
    }
}
