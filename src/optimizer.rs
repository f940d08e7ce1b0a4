use ndarray::{Array1, Array2, Dimension, Zip};
use serde::{Deserialize, Serialize};

/// Applies one gradient step to a layer's parameters.
///
/// `layer` identifies the parameter tensor so that stateful optimizers keep
/// separate moment estimates per layer. `end_step` is called once after every
/// layer of a minibatch has been updated.
pub trait Optimizer {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32);
    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32);
    fn end_step(&mut self) {}
}

/// Which optimizer the agent trains its local network with.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    #[default]
    Adam,
    Sgd,
}

impl OptimizerKind {
    /// Fresh optimizer state; Adam uses the usual `(0.9, 0.999, 1e-8)`.
    pub fn build(self) -> OptimizerWrapper {
        match self {
            OptimizerKind::Adam => OptimizerWrapper::Adam(Adam::default()),
            OptimizerKind::Sgd => OptimizerWrapper::SGD(SGD::new()),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
}

impl Optimizer for OptimizerWrapper {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(layer, weights, gradients, learning_rate),
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(layer, biases, gradients, learning_rate),
        }
    }

    fn end_step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.end_step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.end_step(),
        }
    }
}

/// Plain stochastic gradient descent.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }

    fn update_biases(&mut self, _layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        biases.zip_mut_with(gradients, |b, &g| *b -= learning_rate * g);
    }
}

/// Adam with bias-corrected moment estimates.
///
/// Moment buffers are allocated lazily the first time a layer index is seen,
/// and reallocated if that layer's shape changes.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Array2<f32>>,
    v_weights: Vec<Array2<f32>>,
    m_biases: Vec<Array1<f32>>,
    v_biases: Vec<Array1<f32>>,
    /// Number of completed steps plus one.
    pub t: i32,
}

impl Adam {
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m_weights: Vec::new(),
            v_weights: Vec::new(),
            m_biases: Vec::new(),
            v_biases: Vec::new(),
            t: 1,
        }
    }

    fn slot<D: Dimension>(
        buffers: &mut Vec<ndarray::Array<f32, D>>,
        layer: usize,
        dim: D::Pattern,
    ) -> &mut ndarray::Array<f32, D>
    where
        D::Pattern: Clone,
    {
        while buffers.len() <= layer {
            buffers.push(ndarray::Array::zeros(dim.clone()));
        }
        let expected = ndarray::Array::<f32, D>::zeros(dim.clone());
        if buffers[layer].shape() != expected.shape() {
            buffers[layer] = expected;
        }
        &mut buffers[layer]
    }

    fn apply<D: Dimension>(
        &self,
        params: &mut ndarray::Array<f32, D>,
        m: &mut ndarray::Array<f32, D>,
        v: &mut ndarray::Array<f32, D>,
        gradients: &ndarray::Array<f32, D>,
        learning_rate: f32,
    ) {
        let (beta1, beta2, eps) = (self.beta1, self.beta2, self.epsilon);
        let bias1 = 1.0 - beta1.powi(self.t);
        let bias2 = 1.0 - beta2.powi(self.t);
        Zip::from(params)
            .and(m)
            .and(v)
            .and(gradients)
            .for_each(|p, m, v, &g| {
                *m = beta1 * *m + (1.0 - beta1) * g;
                *v = beta2 * *v + (1.0 - beta2) * g * g;
                let m_hat = *m / bias1;
                let v_hat = *v / bias2;
                *p -= learning_rate * m_hat / (v_hat.sqrt() + eps);
            });
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>, learning_rate: f32) {
        let mut m = std::mem::take(Self::slot(&mut self.m_weights, layer, weights.dim()));
        let mut v = std::mem::take(Self::slot(&mut self.v_weights, layer, weights.dim()));
        self.apply(weights, &mut m, &mut v, gradients, learning_rate);
        self.m_weights[layer] = m;
        self.v_weights[layer] = v;
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>, learning_rate: f32) {
        let mut m = std::mem::take(Self::slot(&mut self.m_biases, layer, biases.dim()));
        let mut v = std::mem::take(Self::slot(&mut self.v_biases, layer, biases.dim()));
        self.apply(biases, &mut m, &mut v, gradients, learning_rate);
        self.m_biases[layer] = m;
        self.v_biases[layer] = v;
    }

    fn end_step(&mut self) {
        self.t = self.t.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn adam_keeps_separate_state_per_layer() {
        let mut adam = Adam::default();
        let mut a = array![[1.0f32, 1.0]];
        let mut b = array![[1.0f32], [1.0], [1.0]];
        adam.update_weights(0, &mut a, &array![[1.0, -1.0]], 0.1);
        adam.update_weights(1, &mut b, &array![[1.0], [1.0], [1.0]], 0.1);
        adam.end_step();
        assert_eq!(adam.m_weights.len(), 2);
        assert_eq!(adam.m_weights[1].dim(), (3, 1));
        // first bias-corrected Adam step moves each parameter by ~lr
        assert!((a[[0, 0]] - 0.9).abs() < 1e-4);
        assert!((a[[0, 1]] - 1.1).abs() < 1e-4);
        assert_eq!(adam.t, 2);
    }
}
