use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::errors::ClassifierError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
    Softmax,
}

/// Capa densa con kernel en layout `[entrada][salida]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub activation: Activation,
}

impl DenseLayer {
    fn input_width(&self) -> usize { self.weights.len() }
    fn output_width(&self) -> usize { self.bias.len() }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut out = self.bias.clone();
        for (x, row) in input.iter().zip(&self.weights) {
            for (acc, w) in out.iter_mut().zip(row) {
                *acc += x * w;
            }
        }
        apply_activation(self.activation, &mut out);
        out
    }
}

fn apply_activation(activation: Activation, values: &mut [f32]) {
    match activation {
        Activation::Linear => {}
        Activation::Relu => values.iter_mut().for_each(|v| *v = v.max(0.0)),
        Activation::Sigmoid => values.iter_mut().for_each(|v| *v = 1.0 / (1.0 + (-*v).exp())),
        Activation::Tanh => values.iter_mut().for_each(|v| *v = v.tanh()),
        Activation::Softmax => {
            // Resta del máximo para estabilidad numérica.
            let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let mut sum = 0.0;
            for v in values.iter_mut() {
                *v = (*v - max).exp();
                sum += *v;
            }
            if sum > 0.0 {
                values.iter_mut().for_each(|v| *v /= sum);
            }
        }
    }
}

/// Red feed-forward congelada (equivalente a un `Sequential` de capas densas).
#[derive(Debug, Clone, PartialEq)]
pub struct DenseNetwork {
    input_dim: usize,
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Valida que las formas encadenen: la entrada de cada capa coincide con la
    /// salida de la anterior y cada fila del kernel tiene el ancho del bias.
    pub fn new(input_dim: usize, layers: Vec<DenseLayer>) -> Result<Self, ClassifierError> {
        if layers.is_empty() {
            return Err(ClassifierError::InvalidShape("network has no layers".into()));
        }
        let mut width = input_dim;
        for (i, layer) in layers.iter().enumerate() {
            if layer.input_width() != width {
                return Err(ClassifierError::InvalidShape(format!("layer {i}: kernel has {} rows, expected {width}",
                                                                 layer.input_width())));
            }
            if layer.output_width() == 0 {
                return Err(ClassifierError::InvalidShape(format!("layer {i}: empty bias")));
            }
            if let Some(row) = layer.weights.iter().find(|r| r.len() != layer.output_width()) {
                return Err(ClassifierError::InvalidShape(format!("layer {i}: kernel row has {} columns, bias has {}",
                                                                 row.len(),
                                                                 layer.output_width())));
            }
            width = layer.output_width();
        }
        Ok(Self { input_dim, layers })
    }

    pub fn layers(&self) -> &[DenseLayer] { &self.layers }
}

impl Classifier for DenseNetwork {
    fn input_dim(&self) -> usize { self.input_dim }

    fn class_count(&self) -> usize { self.layers.last().map(DenseLayer::output_width).unwrap_or(0) }

    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ClassifierError> {
        if features.len() != self.input_dim {
            return Err(ClassifierError::DimensionMismatch { expected: self.input_dim,
                                                            got: features.len() });
        }
        let out = self.layers.iter().fold(features.to_vec(), |acc, layer| layer.forward(&acc));
        if out.iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::NonFinite);
        }
        Ok(out)
    }
}
