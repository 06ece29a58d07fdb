use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::{sigmoid, sigmoid_prime};
use crate::error::{HematiteError, Result};
use crate::loss::SquaredError;
use crate::network::state::ForwardState;

/// A feedforward network with exactly one hidden layer.
///
/// Weight layout is row-major by destination unit: `input_weights` holds
/// `n_hidden` rows of `n_inputs` values (row `i` feeds hidden unit `i`), and
/// `hidden_weights` holds `n_outputs` rows of `n_hidden` values (row `k`
/// feeds output unit `k`). `biases[0]` is added to every hidden
/// pre-activation, `biases[1]` to every output pre-activation. The
/// serialized model formats depend on this enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    n_inputs: usize,
    n_hidden: usize,
    n_outputs: usize,
    input_weights: Vec<f64>,
    hidden_weights: Vec<f64>,
    biases: [f64; 2],
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Network {
    /// Builds a freshly randomized network using the thread-local generator.
    pub fn new(n_inputs: usize, n_hidden: usize, n_outputs: usize) -> Result<Network> {
        Network::with_rng(n_inputs, n_hidden, n_outputs, &mut rand::thread_rng())
    }

    /// Builds a freshly randomized network, drawing every weight and bias
    /// uniformly from [-0.5, 0.5) out of the supplied generator.
    ///
    /// The generator is used only during construction and never stored, so a
    /// seeded `StdRng` gives fully reproducible networks.
    pub fn with_rng<R: Rng>(
        n_inputs: usize,
        n_hidden: usize,
        n_outputs: usize,
        rng: &mut R,
    ) -> Result<Network> {
        check_dimensions(n_inputs, n_hidden, n_outputs)?;

        let input_weights = (0..n_inputs * n_hidden)
            .map(|_| rng.gen::<f64>() - 0.5)
            .collect();
        let hidden_weights = (0..n_hidden * n_outputs)
            .map(|_| rng.gen::<f64>() - 0.5)
            .collect();
        let biases = [rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5];

        Ok(Network {
            n_inputs,
            n_hidden,
            n_outputs,
            input_weights,
            hidden_weights,
            biases,
        })
    }

    /// Builds a network from explicit parameter values.
    ///
    /// `input_weights` must hold `n_inputs * n_hidden` values and
    /// `hidden_weights` must hold `n_hidden * n_outputs`, both row-major by
    /// destination unit.
    pub fn from_parts(
        n_inputs: usize,
        n_hidden: usize,
        n_outputs: usize,
        biases: [f64; 2],
        input_weights: Vec<f64>,
        hidden_weights: Vec<f64>,
    ) -> Result<Network> {
        check_dimensions(n_inputs, n_hidden, n_outputs)?;
        if input_weights.len() != n_inputs * n_hidden {
            return Err(HematiteError::DimensionMismatch {
                expected: n_inputs * n_hidden,
                actual: input_weights.len(),
            });
        }
        if hidden_weights.len() != n_hidden * n_outputs {
            return Err(HematiteError::DimensionMismatch {
                expected: n_hidden * n_outputs,
                actual: hidden_weights.len(),
            });
        }

        Ok(Network {
            n_inputs,
            n_hidden,
            n_outputs,
            input_weights,
            hidden_weights,
            biases,
        })
    }
}

// ---------------------------------------------------------------------------
// Inference and training
// ---------------------------------------------------------------------------

impl Network {
    /// Runs forward propagation only and returns the output activations.
    /// Does not mutate the network.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input(input)?;
        Ok(self.propagate(input).into_outputs())
    }

    /// Runs one forward + backward pass for a single example, updating the
    /// weights in place, and returns the total error of the pass.
    ///
    /// Vector lengths are validated before any weight is touched, so a
    /// failed call leaves the network unchanged.
    pub fn train(&mut self, input: &[f64], target: &[f64], rate: f64) -> Result<f64> {
        self.check_input(input)?;
        if target.len() != self.n_outputs {
            return Err(HematiteError::DimensionMismatch {
                expected: self.n_outputs,
                actual: target.len(),
            });
        }

        let state = self.propagate(input);
        self.back_propagate(&state, input, target, rate);
        SquaredError::total(state.output_activations(), target)
    }

    /// Forward propagation. Pure with respect to the network; the caller has
    /// already validated the input length.
    fn propagate(&self, input: &[f64]) -> ForwardState {
        let mut hidden = Vec::with_capacity(self.n_hidden);
        for i in 0..self.n_hidden {
            let mut sum = 0.0;
            for j in 0..self.n_inputs {
                sum += input[j] * self.input_weight(i, j);
            }
            hidden.push(sigmoid(sum + self.biases[0]));
        }

        let mut output = Vec::with_capacity(self.n_outputs);
        for k in 0..self.n_outputs {
            let mut sum = 0.0;
            for i in 0..self.n_hidden {
                sum += hidden[i] * self.hidden_weight(k, i);
            }
            output.push(sigmoid(sum + self.biases[1]));
        }

        ForwardState::new(hidden, output)
    }

    /// Per-example gradient-descent update against a forward state.
    ///
    /// For each hidden unit the error contributions flowing back through the
    /// hidden weights are accumulated and the hidden weights updated in the
    /// same sweep; each weight is read into a local before it is written, so
    /// both the accumulated sum and the update base see the value as it
    /// stood at the start of that iteration. Only after the sum is complete
    /// is the unit's input-weight row updated. Biases are not trained.
    fn back_propagate(
        &mut self,
        state: &ForwardState,
        input: &[f64],
        target: &[f64],
        rate: f64,
    ) {
        for i in 0..self.n_hidden {
            let mut sum = 0.0;

            for k in 0..self.n_outputs {
                let err = SquaredError::derivative(state.output(k), target[k]);
                let slope = sigmoid_prime(state.output(k));
                let w = self.hidden_weight(k, i);

                sum += err * slope * w;
                self.set_hidden_weight(k, i, w - rate * err * slope * state.hidden(i));
            }

            let slope = sigmoid_prime(state.hidden(i));
            for j in 0..self.n_inputs {
                let w = self.input_weight(i, j);
                self.set_input_weight(i, j, w - rate * sum * slope * input[j]);
            }
        }
    }

    fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.n_inputs {
            return Err(HematiteError::DimensionMismatch {
                expected: self.n_inputs,
                actual: input.len(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Parameter access
// ---------------------------------------------------------------------------

impl Network {
    /// `(n_inputs, n_hidden, n_outputs)` as fixed at construction.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.n_inputs, self.n_hidden, self.n_outputs)
    }

    pub fn input_weights(&self) -> &[f64] {
        &self.input_weights
    }

    pub fn hidden_weights(&self) -> &[f64] {
        &self.hidden_weights
    }

    pub fn biases(&self) -> &[f64; 2] {
        &self.biases
    }

    fn input_weight(&self, hidden: usize, input: usize) -> f64 {
        self.input_weights[hidden * self.n_inputs + input]
    }

    fn set_input_weight(&mut self, hidden: usize, input: usize, weight: f64) {
        self.input_weights[hidden * self.n_inputs + input] = weight;
    }

    fn hidden_weight(&self, output: usize, hidden: usize) -> f64 {
        self.hidden_weights[output * self.n_hidden + hidden]
    }

    fn set_hidden_weight(&mut self, output: usize, hidden: usize, weight: f64) {
        self.hidden_weights[output * self.n_hidden + hidden] = weight;
    }
}

fn check_dimensions(n_inputs: usize, n_hidden: usize, n_outputs: usize) -> Result<()> {
    for (name, value) in [
        ("n_inputs", n_inputs),
        ("n_hidden", n_hidden),
        ("n_outputs", n_outputs),
    ] {
        if value == 0 {
            return Err(HematiteError::InvalidDimension(format!(
                "{name} must be positive"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ones_2_2_1() -> Network {
        Network::from_parts(2, 2, 1, [0.0, 0.0], vec![1.0; 4], vec![1.0; 2]).unwrap()
    }

    #[test]
    fn fresh_network_has_exact_sizes_and_bounded_values() {
        let net = Network::new(3, 5, 2).unwrap();
        assert_eq!(net.dimensions(), (3, 5, 2));
        assert_eq!(net.input_weights().len(), 15);
        assert_eq!(net.hidden_weights().len(), 10);

        let all = net.input_weights().iter()
            .chain(net.hidden_weights())
            .chain(net.biases());
        for &v in all {
            assert!((-0.5..=0.5).contains(&v), "value {v} outside [-0.5, 0.5]");
        }
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let err = Network::new(2, 0, 1).unwrap_err();
        assert!(matches!(err, HematiteError::InvalidDimension(_)));
    }

    #[test]
    fn from_parts_rejects_wrong_weight_counts() {
        let err = Network::from_parts(2, 2, 1, [0.0, 0.0], vec![1.0; 3], vec![1.0; 2])
            .unwrap_err();
        assert!(matches!(
            err,
            HematiteError::DimensionMismatch { expected: 4, actual: 3 }
        ));
    }

    #[test]
    fn all_zero_network_predicts_one_half_everywhere() {
        let net =
            Network::from_parts(3, 4, 2, [0.0, 0.0], vec![0.0; 12], vec![0.0; 8]).unwrap();
        for input in [[0.0, 0.0, 0.0], [1.0, -7.5, 42.0]] {
            let out = net.predict(&input).unwrap();
            assert_eq!(out, vec![0.5, 0.5]);
        }
    }

    #[test]
    fn unit_weight_network_matches_hand_computed_forward_value() {
        let net = ones_2_2_1();
        let out = net.predict(&[0.0, 0.0]).unwrap();
        // hidden = [σ(0), σ(0)] = [0.5, 0.5]; output = σ(0.5 + 0.5) = σ(1)
        assert_eq!(out.len(), 1);
        assert!((out[0] - 0.7310585786).abs() < 1e-9);
    }

    #[test]
    fn predict_rejects_wrong_input_length() {
        let net = ones_2_2_1();
        let err = net.predict(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            HematiteError::DimensionMismatch { expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn failed_train_leaves_weights_untouched() {
        let mut net = ones_2_2_1();
        let before = net.clone();

        assert!(net.train(&[1.0, 1.0], &[0.5, 0.5], 0.5).is_err());
        assert!(net.train(&[1.0], &[0.5], 0.5).is_err());
        assert_eq!(net, before);
    }

    #[test]
    fn single_update_follows_the_descent_rule() {
        // 1-1-1 network: small enough to replay the update by hand.
        let mut net =
            Network::from_parts(1, 1, 1, [0.0, 0.0], vec![0.5], vec![0.25]).unwrap();
        let (x, t, rate) = (1.0, 0.0, 1.0);

        let h = sigmoid(0.5 * x);
        let o = sigmoid(0.25 * h);
        let err = o - t;
        let hidden_after = 0.25 - rate * err * sigmoid_prime(o) * h;
        // The backflow sum must use the hidden weight as it stood BEFORE the
        // update above.
        let backflow = err * sigmoid_prime(o) * 0.25;
        let input_after = 0.5 - rate * backflow * sigmoid_prime(h) * x;

        let total = net.train(&[x], &[t], rate).unwrap();
        assert!((total - 0.5 * (t - o).powi(2)).abs() < 1e-12);
        assert!((net.hidden_weights()[0] - hidden_after).abs() < 1e-12);
        assert!((net.input_weights()[0] - input_after).abs() < 1e-12);
    }

    #[test]
    fn repeated_training_on_one_pair_drives_error_down() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut net = Network::with_rng(2, 2, 1, &mut rng).unwrap();

        let input = [0.25, 0.75];
        let target = [0.8];

        let first = net.train(&input, &target, 0.5).unwrap();
        let mut last = first;
        for _ in 0..999 {
            last = net.train(&input, &target, 0.5).unwrap();
        }
        assert!(
            last < first,
            "error failed to decrease: started {first}, ended {last}"
        );
        assert!(last < 1e-3, "error still {last} after 1000 iterations");
    }
}
