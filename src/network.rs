use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::error::{DqnError, Result};
use crate::layers::DenseLayer;
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A feed-forward network of dense layers together with the optimizer that
/// trains it. The DQN agent keeps two of these: the local network it trains
/// and acts with, and the slowly tracking target network.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<DenseLayer>,
    pub optimizer: OptimizerWrapper,
}

impl NeuralNetwork {
    /// Create a network from `layer_sizes` (input, hidden..., output) with
    /// one activation per weight layer.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(DqnError::invalid_parameter(
                "layer_sizes",
                "Network must have at least input and output layers",
            ));
        }
        if layer_sizes.iter().any(|&size| size == 0) {
            return Err(DqnError::invalid_parameter(
                "layer_sizes",
                "Every layer must have at least one unit",
            ));
        }
        if activations.len() != layer_sizes.len() - 1 {
            return Err(DqnError::dimension_mismatch(
                format!("{} activations", layer_sizes.len() - 1),
                format!("{} activations", activations.len()),
            ));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| DenseLayer::new(window[0], window[1], activation, rng))
            .collect();

        Ok(NeuralNetwork { layers, optimizer })
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, DenseLayer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::output_size)
    }

    fn check_input(&self, width: usize) -> Result<()> {
        if width != self.input_size() {
            return Err(DqnError::dimension_mismatch(
                format!("input of length {}", self.input_size()),
                format!("input of length {}", width),
            ));
        }
        Ok(())
    }

    /// Q-values for a single state, without touching the backprop cache.
    pub fn predict(&self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        let output = self.predict_batch(input.insert_axis(Axis(0)))?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    /// Q-values for a batch of states (one state per row).
    pub fn predict_batch(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input(inputs.ncols())?;
        let mut current = inputs.to_owned();
        for layer in &self.layers {
            current = layer.predict_batch(current.view());
        }
        Ok(current)
    }

    /// Forward pass that records what `apply_output_errors` needs.
    pub fn forward_batch(&mut self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input(inputs.ncols())?;
        let mut current = inputs.to_owned();
        for layer in &mut self.layers {
            current = layer.forward_batch(current.view());
        }
        Ok(current)
    }

    /// Backpropagate `dLoss/dOutput` for the batch of the last
    /// `forward_batch` and take one optimizer step.
    pub fn apply_output_errors(&mut self, output_errors: ArrayView2<f32>, learning_rate: f32) -> Result<()> {
        let mut gradients = Vec::with_capacity(self.layers.len());
        let mut current_error = output_errors.to_owned();

        for (i, layer) in self.layers.iter().enumerate().rev() {
            let (adjusted_error, weight_gradients, bias_gradients) =
                layer.backward_batch(current_error.view())?;
            gradients.push((weight_gradients, bias_gradients));
            if i != 0 {
                current_error = adjusted_error.dot(&layer.weights.t());
            }
        }
        gradients.reverse();

        if gradients
            .iter()
            .any(|(w, b)| w.iter().chain(b.iter()).any(|g| !g.is_finite()))
        {
            return Err(DqnError::NumericalError("non-finite gradient".to_string()));
        }

        for (index, (layer, (weight_gradients, bias_gradients))) in
            self.layers.iter_mut().zip(gradients).enumerate()
        {
            self.optimizer.update_weights(index, &mut layer.weights, &weight_gradients, learning_rate);
            self.optimizer.update_biases(index, &mut layer.biases, &bias_gradients, learning_rate);
        }
        self.optimizer.end_step();
        Ok(())
    }

    /// Move every parameter towards `source`:
    /// `θ = tau * θ_source + (1 - tau) * θ`.
    pub fn soft_update_from(&mut self, source: &NeuralNetwork, tau: f32) -> Result<()> {
        self.check_same_shape(source)?;
        for (target, local) in self.layers.iter_mut().zip(&source.layers) {
            target
                .weights
                .zip_mut_with(&local.weights, |t, &l| *t = tau * l + (1.0 - tau) * *t);
            target
                .biases
                .zip_mut_with(&local.biases, |t, &l| *t = tau * l + (1.0 - tau) * *t);
        }
        Ok(())
    }

    pub fn check_same_shape(&self, other: &NeuralNetwork) -> Result<()> {
        let shapes = |net: &NeuralNetwork| {
            net.layers
                .iter()
                .map(|l| (l.input_size(), l.output_size()))
                .collect::<Vec<_>>()
        };
        let (mine, theirs) = (shapes(self), shapes(other));
        if mine != theirs {
            return Err(DqnError::dimension_mismatch(
                format!("{:?}", mine),
                format!("{:?}", theirs),
            ));
        }
        Ok(())
    }
}
