use crate::attractors::AttractorSolver;
use crate::error::Result;
use crate::outputs::{global_output, ModelOutputs};
use crate::perturbations::{Perturbation, PerturbationModel, Response};
use crate::BooleanModel;
use std::path::Path;

impl<'a> PerturbationModel<'a> {
    /// Create a perturbed version of `base`: the target of every drug is fixed to the effect
    /// of that drug. Targets which are not in the model are skipped with a warning.
    ///
    /// The name of the model is the name of `base` followed by the names of all drugs
    /// (e.g. `model_A_B`).
    pub fn new(base: &'a BooleanModel, perturbation: &'a Perturbation) -> PerturbationModel<'a> {
        let mut name = base.name().to_string();
        let mut fixed = Vec::new();
        for drug in perturbation.combination().drugs() {
            name.push('_');
            name.push_str(drug.name());
            for target in drug.targets() {
                if base.find_variable(target).is_some() {
                    fixed.push((target.clone(), drug.effect()));
                } else {
                    tracing::warn!(
                        model = base.name(),
                        "Target `{}` of drug `{}` is not in the model",
                        target,
                        drug.name()
                    );
                }
            }
        }
        tracing::trace!(model = %name, fixed = ?fixed, "Added new perturbation model.");
        PerturbationModel {
            base,
            perturbation,
            name,
            fixed,
            attractors: Vec::new(),
            response: Response::NotSimulated,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn perturbation(&self) -> &'a Perturbation {
        self.perturbation
    }

    /// Nodes fixed by this perturbation together with their value. If two drugs target the
    /// same node, the later one takes effect.
    pub fn fixed_nodes(&self) -> &[(String, bool)] {
        &self.fixed
    }

    /// Create the actual perturbed `BooleanModel`.
    pub fn materialize(&self) -> BooleanModel {
        let mut model = self.base.clone();
        model.set_name(self.name.as_str());
        for (node, value) in &self.fixed {
            model.fix_variable(node, *value);
        }
        model
    }

    /// Compute the attractors of the perturbed model and its raw global output.
    ///
    /// A model without attractors has no global output (`Response::NotAvailable`), which
    /// is not an error. Solver failures are propagated.
    pub fn compute_global_output(
        &mut self,
        solver: &dyn AttractorSolver,
        outputs: &ModelOutputs,
        scratch: &Path,
    ) -> Result<Response> {
        let model = self.materialize();
        self.attractors = solver.attractors(&model, scratch)?;
        self.response = match global_output(&model, &self.attractors, outputs) {
            Some(value) => {
                tracing::debug!("{}\t{}", self.perturbation.name(), value);
                Response::Known(value)
            }
            None => {
                tracing::debug!("No attractors found: {}\tNA", self.perturbation.name());
                Response::NotAvailable
            }
        };
        Ok(self.response)
    }

    pub fn attractors(&self) -> &[String] {
        &self.attractors
    }

    pub fn response(&self) -> Response {
        self.response
    }

    pub fn has_global_output(&self) -> bool {
        matches!(self.response, Response::Known(_))
    }

    /// Raw global output, if known.
    pub fn global_output(&self) -> Option<f64> {
        match self.response {
            Response::Known(value) => Some(value),
            _ => None,
        }
    }

    /// Global output normalized into `[0, 1]`, see `ModelOutputs::normalize`.
    pub fn normalized_global_output(&self, outputs: &ModelOutputs) -> Option<f64> {
        self.global_output().map(|it| outputs.normalize(it))
    }
}
