//! Serialized snapshots of learned network parameters.
//!
//! A checkpoint holds only the weights, biases and activation of each layer,
//! not the optimizer state. It is written with `bincode` to a single file;
//! there is no versioning and no atomic replace.

use std::fs;
use std::path::Path;

use log::info;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::error::{DqnError, Result};
use crate::network::NeuralNetwork;

/// Default checkpoint file name.
pub const DEFAULT_CHECKPOINT: &str = "checkpoint.bin";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LayerParameters {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Checkpoint {
    pub layers: Vec<LayerParameters>,
}

impl Checkpoint {
    pub fn from_network(network: &NeuralNetwork) -> Self {
        let layers = network
            .layers
            .iter()
            .map(|layer| LayerParameters {
                weights: layer.weights.clone(),
                biases: layer.biases.clone(),
                activation: layer.activation,
            })
            .collect();
        Checkpoint { layers }
    }

    /// Copy these parameters into `network`. Layer count and every weight
    /// shape must match; on mismatch the network is left untouched.
    pub fn apply_to(&self, network: &mut NeuralNetwork) -> Result<()> {
        if self.layers.len() != network.layers.len() {
            return Err(DqnError::dimension_mismatch(
                format!("{} layers", network.layers.len()),
                format!("{} layers", self.layers.len()),
            ));
        }
        for (params, layer) in self.layers.iter().zip(&network.layers) {
            if params.weights.dim() != layer.weights.dim() || params.biases.len() != layer.biases.len() {
                return Err(DqnError::dimension_mismatch(
                    format!("weights {:?}", layer.weights.dim()),
                    format!("weights {:?}", params.weights.dim()),
                ));
            }
        }
        for (params, layer) in self.layers.iter().zip(network.layers.iter_mut()) {
            layer.weights.assign(&params.weights);
            layer.biases.assign(&params.biases);
            layer.activation = params.activation;
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        fs::write(path.as_ref(), serialized)?;
        info!("Saved checkpoint to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path.as_ref())?;
        let checkpoint: Self = bincode::deserialize(&data)?;
        info!("Loaded checkpoint from {}", path.as_ref().display());
        Ok(checkpoint)
    }
}
