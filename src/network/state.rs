/// Activations produced by one forward pass.
///
/// Ephemeral: a `ForwardState` is created by the forward pass,
/// consumed immediately by the backward pass or by the caller, and then
/// discarded. The network itself never caches activations.
#[derive(Debug, Clone)]
pub struct ForwardState {
    hidden: Vec<f64>,
    output: Vec<f64>,
}

impl ForwardState {
    pub(crate) fn new(hidden: Vec<f64>, output: Vec<f64>) -> ForwardState {
        ForwardState { hidden, output }
    }

    /// Activation of hidden unit `i`, in (0, 1).
    pub fn hidden(&self, i: usize) -> f64 {
        self.hidden[i]
    }

    /// Activation of output unit `k`, in (0, 1).
    pub fn output(&self, k: usize) -> f64 {
        self.output[k]
    }

    pub fn hidden_activations(&self) -> &[f64] {
        &self.hidden
    }

    pub fn output_activations(&self) -> &[f64] {
        &self.output
    }

    /// Consumes the state, keeping only the output vector.
    pub fn into_outputs(self) -> Vec<f64> {
        self.output
    }
}
