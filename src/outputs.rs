//! Weighted output nodes of the models and the *global output* of a set of attractors.
//!
//! The model outputs file is tab separated, one `node<TAB>weight` pair per line,
//! where weight is a signed integer. Lines starting with `#` are comments.

use crate::error::{DrugSynergyError, Result};
use crate::{content_lines, BooleanModel};
use std::path::Path;

const MODEL_OUTPUTS_TEMPLATE: &str = "# File for defining model outputs
# Model outputs specified must match names used in model definition
#
# Use tab-separated columns
# Name: Node name
# Weight: Signed integer used for calculating model simulation output.
#
# Name\tWeight
";

/// One output node of the models together with its weight.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutputWeight {
    pub node: String,
    pub weight: i32,
}

/// The set of weighted output nodes shared by all models of an analysis.
///
/// At least one weight is non-zero, so that the global output can be normalized.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModelOutputs {
    weights: Vec<OutputWeight>,
}

impl ModelOutputs {
    pub fn new(weights: Vec<OutputWeight>) -> Result<ModelOutputs> {
        if weights.iter().all(|it| it.weight == 0) {
            return Err(DrugSynergyError::config(
                "Model outputs must contain at least one node with a non-zero weight",
            ));
        }
        Ok(ModelOutputs { weights })
    }

    /// Parse model outputs from the tab separated `node<TAB>weight` format.
    pub fn try_from_tab(content: &str) -> Result<ModelOutputs> {
        let mut weights = Vec::new();
        for line in content_lines(content) {
            let fields: Vec<&str> = line.split('\t').map(|it| it.trim()).collect();
            if fields.len() < 2 {
                return Err(DrugSynergyError::config(format!(
                    "Unexpected model outputs line: `{}`",
                    line
                )));
            }
            let weight = fields[1].parse::<i32>().map_err(|e| {
                DrugSynergyError::config(format!(
                    "Invalid weight `{}` of output `{}`: {}",
                    fields[1], fields[0], e
                ))
            })?;
            tracing::debug!(node = fields[0], weight, "Added model output.");
            weights.push(OutputWeight {
                node: fields[0].to_string(),
                weight,
            });
        }
        ModelOutputs::new(weights)
    }

    pub fn try_from_file<P: AsRef<Path>>(path: P) -> Result<ModelOutputs> {
        let path = path.as_ref();
        tracing::info!("Reading model outputs file: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        ModelOutputs::try_from_tab(content.as_str())
    }

    /// Write an (empty) commented model outputs file to the given path.
    pub fn write_template<P: AsRef<Path>>(path: P) -> Result<()> {
        std::fs::write(path, MODEL_OUTPUTS_TEMPLATE)?;
        Ok(())
    }

    pub fn weights(&self) -> &[OutputWeight] {
        &self.weights
    }

    /// The smallest achievable weighted sum (sum of all negative weights).
    pub fn min_output(&self) -> f64 {
        self.weights.iter().map(|it| f64::from(it.weight.min(0))).sum()
    }

    /// The largest achievable weighted sum (sum of all positive weights).
    pub fn max_output(&self) -> f64 {
        self.weights.iter().map(|it| f64::from(it.weight.max(0))).sum()
    }

    /// Map a raw global output into `[0, 1]` using `min_output` and `max_output`.
    pub fn normalize(&self, raw: f64) -> f64 {
        let min = self.min_output();
        (raw - min) / (self.max_output() - min)
    }

    /// Log a warning for every output node which is not a variable of `model`.
    ///
    /// Returns the names of the missing nodes.
    pub fn check_output_nodes(&self, model: &BooleanModel) -> Vec<String> {
        let mut missing = Vec::new();
        for output in &self.weights {
            if model.find_variable(&output.node).is_none() {
                tracing::warn!(
                    "Output node `{}` is not in the network file/model",
                    output.node
                );
                missing.push(output.node.clone());
            }
        }
        missing
    }
}

/// Compute the raw global output of a model with the given attractors.
///
/// Every attractor contributes `value * weight` for every output node, where the value is
/// `0`, `1`, or `0.5` for a free (`-`) position. The sum is then averaged over all attractors.
/// Output nodes which are not variables of the model contribute nothing.
///
/// Returns `None` if there are no attractors.
pub fn global_output(
    model: &BooleanModel,
    attractors: &[String],
    outputs: &ModelOutputs,
) -> Option<f64> {
    if attractors.is_empty() {
        return None;
    }
    let indices: Vec<(usize, f64)> = outputs
        .weights
        .iter()
        .filter_map(|output| {
            let id = model.find_variable(&output.node)?;
            Some((id.to_index(), f64::from(output.weight)))
        })
        .collect();

    let mut total = 0.0;
    for attractor in attractors {
        let attractor = attractor.as_bytes();
        for (index, weight) in &indices {
            let value = match attractor.get(*index) {
                Some(b'1') => 1.0,
                Some(b'-') => 0.5,
                _ => 0.0,
            };
            total += value * weight;
        }
    }
    Some(total / attractors.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::{global_output, ModelOutputs};
    use crate::BooleanModel;

    const OUTPUTS: &str = "# Name\tWeight\nA\t1\nB\t-1\nC\t1\nMissing\t-1\n";

    #[test]
    fn read_model_outputs() {
        let outputs = ModelOutputs::try_from_tab(OUTPUTS).unwrap();
        assert_eq!(4, outputs.weights().len());
        assert_eq!(-2.0, outputs.min_output());
        assert_eq!(2.0, outputs.max_output());
        assert_eq!(0.5, outputs.normalize(0.0));
        assert_eq!(1.0, outputs.normalize(2.0));
        assert!((outputs.normalize(0.7) - 0.675).abs() < 1e-12);

        assert!(ModelOutputs::try_from_tab("A\tx").is_err());
        assert!(ModelOutputs::try_from_tab("A").is_err());
        assert!(ModelOutputs::try_from_tab("A\t0\n").is_err());
        assert!(ModelOutputs::try_from_tab("").is_err());
    }

    #[test]
    fn template_has_no_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modeloutputs");
        ModelOutputs::write_template(&path).unwrap();
        // The template only contains comments, so it is not a valid outputs file yet.
        assert!(ModelOutputs::try_from_file(&path).is_err());
        std::fs::write(&path, OUTPUTS).unwrap();
        assert!(ModelOutputs::try_from_file(&path).is_ok());
    }

    #[test]
    fn compute_global_output() {
        let outputs = ModelOutputs::try_from_tab(OUTPUTS).unwrap();
        let model = BooleanModel::try_from_bnet("A, A\nB, B\nC, C\nD, D").unwrap();
        assert_eq!(vec!["Missing".to_string()], outputs.check_output_nodes(&model));

        assert_eq!(None, global_output(&model, &[], &outputs));
        let single = vec!["1011".to_string()];
        assert_eq!(Some(2.0), global_output(&model, &single, &outputs));
        let two = vec!["1011".to_string(), "0100".to_string()];
        assert_eq!(Some(0.5), global_output(&model, &two, &outputs));
        // Free positions count as one half.
        let free = vec!["-0-0".to_string()];
        assert_eq!(Some(1.0), global_output(&model, &free, &outputs));
    }
}
