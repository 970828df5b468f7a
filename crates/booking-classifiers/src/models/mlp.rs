//! Multi-layer perceptron replayed from exported weights.
//!
//! The export holds one weight matrix per layer (`n_in` rows × `n_out`
//! columns) and one bias vector per layer. Hidden layers share one
//! activation; the single output unit is logistic.
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::classifier_trait::ClassifierModel;
use crate::preprocessing::FeatureVector;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Relu,
    Tanh,
    Logistic,
    Identity,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
            Activation::Logistic => logistic(x),
            Activation::Identity => x,
        }
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Exported MLP parameters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MlpParams {
    #[serde(default)]
    pub activation: Activation,
    #[serde(alias = "coefs_")]
    pub coefs: Vec<Vec<Vec<f64>>>,
    #[serde(alias = "intercepts_")]
    pub intercepts: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
struct DenseLayer {
    n_in: usize,
    n_out: usize,
    // row-major, n_in x n_out
    weights: Vec<f64>,
    bias: Vec<f64>,
}

impl DenseLayer {
    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut out = self.bias.clone();
        for (i, &x) in input.iter().enumerate() {
            if x == 0.0 {
                continue;
            }
            let row = &self.weights[i * self.n_out..(i + 1) * self.n_out];
            for (o, &w) in out.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        out
    }
}

/// Binary MLP classifier with a logistic output unit.
#[derive(Debug, Clone)]
pub struct MlpClassifier {
    layers: Vec<DenseLayer>,
    activation: Activation,
}

impl MlpClassifier {
    pub fn from_params(params: MlpParams) -> Result<Self> {
        if params.coefs.is_empty() {
            bail!("MLP has no layers");
        }
        if params.coefs.len() != params.intercepts.len() {
            bail!(
                "MLP has {} weight matrices but {} bias vectors",
                params.coefs.len(),
                params.intercepts.len()
            );
        }

        let mut layers = Vec::with_capacity(params.coefs.len());
        for (idx, (matrix, bias)) in params.coefs.into_iter().zip(params.intercepts).enumerate() {
            let n_in = matrix.len();
            let n_out = bias.len();
            if n_in == 0 || n_out == 0 {
                bail!("MLP layer {} is empty", idx);
            }
            if let Some(prev) = layers.last().map(|l: &DenseLayer| l.n_out) {
                if prev != n_in {
                    bail!("MLP layer {} expects {} inputs but the previous layer has {} outputs", idx, n_in, prev);
                }
            }
            let mut weights = Vec::with_capacity(n_in * n_out);
            for (r, row) in matrix.into_iter().enumerate() {
                if row.len() != n_out {
                    bail!("MLP layer {} row {} has {} weights, expected {}", idx, r, row.len(), n_out);
                }
                weights.extend(row);
            }
            layers.push(DenseLayer { n_in, n_out, weights, bias });
        }

        let outputs = layers.last().map(|l| l.n_out).unwrap_or_default();
        if outputs != 1 {
            bail!("MLP must end in a single output unit for binary classification, found {}", outputs);
        }

        Ok(Self {
            layers,
            activation: params.activation,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read MLP model: {}", path.as_ref().display()))?;
        let params: MlpParams = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse MLP model: {}", path.as_ref().display()))?;
        let model = Self::from_params(params)
            .with_context(|| format!("Invalid MLP model: {}", path.as_ref().display()))?;
        log::debug!(
            "Loaded MLP with {} layers ({:?} hidden activation)",
            model.layers.len(),
            model.activation
        );
        Ok(model)
    }

    fn forward(&self, input: &[f64]) -> f64 {
        let last = self.layers.len() - 1;
        let mut activations = input.to_vec();
        for (idx, layer) in self.layers.iter().enumerate() {
            activations = layer.forward(&activations);
            if idx != last {
                for a in activations.iter_mut() {
                    *a = self.activation.apply(*a);
                }
            }
        }
        logistic(activations[0])
    }
}

impl ClassifierModel for MlpClassifier {
    fn n_features(&self) -> Option<usize> {
        self.layers.first().map(|l| l.n_in)
    }

    fn predict_proba(&self, x: &FeatureVector) -> f64 {
        self.forward(x.values())
    }

    fn name(&self) -> &str {
        "mlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(coefs: Vec<Vec<Vec<f64>>>, intercepts: Vec<Vec<f64>>) -> MlpParams {
        MlpParams {
            activation: Activation::Relu,
            coefs,
            intercepts,
        }
    }

    #[test]
    fn single_layer_is_logistic_regression() {
        let mlp = MlpClassifier::from_params(params(vec![vec![vec![2.0], vec![-1.0]]], vec![vec![0.5]]))
            .unwrap();
        let p = mlp.forward(&[1.0, 1.0]);
        assert!((p - logistic(1.5)).abs() < 1e-12);
        assert_eq!(mlp.n_features(), Some(2));
    }

    #[test]
    fn hidden_relu_clips_negative_units() {
        // hidden = relu([x - 1, -x]); out = h0 + h1
        let mlp = MlpClassifier::from_params(params(
            vec![vec![vec![1.0, -1.0]], vec![vec![1.0], vec![1.0]]],
            vec![vec![-1.0, 0.0], vec![0.0]],
        ))
        .unwrap();
        assert!((mlp.forward(&[3.0]) - logistic(2.0)).abs() < 1e-12);
        assert!((mlp.forward(&[-2.0]) - logistic(2.0)).abs() < 1e-12);
        assert!((mlp.forward(&[0.5]) - logistic(0.0)).abs() < 1e-12);
    }

    #[test]
    fn shape_errors_are_reported() {
        // layer 1 expects 3 inputs but layer 0 produces 2
        let bad_chain = params(
            vec![vec![vec![1.0, 1.0]], vec![vec![1.0], vec![1.0], vec![1.0]]],
            vec![vec![0.0, 0.0], vec![0.0]],
        );
        assert!(MlpClassifier::from_params(bad_chain).is_err());

        let ragged = params(vec![vec![vec![1.0], vec![1.0, 2.0]]], vec![vec![0.0]]);
        assert!(MlpClassifier::from_params(ragged).is_err());

        let multi_output = params(vec![vec![vec![1.0, 1.0]]], vec![vec![0.0, 0.0]]);
        assert!(MlpClassifier::from_params(multi_output).is_err());
    }

    #[test]
    fn sklearn_field_names_are_accepted() {
        let p: MlpParams = serde_json::from_str(
            r#"{"activation": "tanh", "coefs_": [[[1.0]]], "intercepts_": [[0.0]]}"#,
        )
        .unwrap();
        assert_eq!(p.activation, Activation::Tanh);
        assert!(MlpClassifier::from_params(p).is_ok());
    }
}
