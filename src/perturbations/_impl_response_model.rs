use crate::attractors::AttractorSolver;
use crate::drugs::DrugCombination;
use crate::error::{DrugSynergyError, Result};
use crate::outputs::ModelOutputs;
use crate::perturbations::{
    ModelPredictions, PerturbationModel, PerturbationPanel, Prediction, Response, ResponseModel,
    SynergyMethod,
};
use crate::BooleanModel;
use std::path::Path;

impl<'a> ResponseModel<'a> {
    /// Create one `PerturbationModel` of `model` for every perturbation in the `panel`.
    pub fn new(model: &'a BooleanModel, panel: &'a PerturbationPanel) -> ResponseModel<'a> {
        tracing::debug!("Initializing response model: {}_responsemodel", model.name());
        let perturbation_models = panel
            .perturbations()
            .iter()
            .map(|perturbation| PerturbationModel::new(model, perturbation))
            .collect();
        ResponseModel {
            model,
            perturbation_models,
            predictions: ModelPredictions::new(model.name()),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn perturbation_models(&self) -> &[PerturbationModel<'a>] {
        &self.perturbation_models
    }

    pub fn predictions(&self) -> &ModelPredictions {
        &self.predictions
    }

    pub fn into_predictions(self) -> ModelPredictions {
        self.predictions
    }

    /// Simulate all perturbations in panel order: compute the global output, add it to the
    /// shared perturbation, and classify every combination of two or more drugs.
    ///
    /// Only solver failures (or an inconsistent panel) are errors. Missing attractors
    /// result in `Prediction::NotAvailable`.
    pub fn simulate_responses(
        &mut self,
        solver: &dyn AttractorSolver,
        outputs: &ModelOutputs,
        method: SynergyMethod,
        scratch: &Path,
    ) -> Result<()> {
        for index in 0..self.perturbation_models.len() {
            let perturbation_model = &mut self.perturbation_models[index];
            let perturbation = perturbation_model.perturbation();
            if let Response::Known(value) =
                perturbation_model.compute_global_output(solver, outputs, scratch)?
            {
                tracing::debug!(
                    "Adding predicted response for perturbation {}: {}",
                    perturbation.name(),
                    value
                );
                perturbation.add_prediction(value);
            }

            if perturbation.size() >= 2 {
                let prediction = self.check_for_synergy(index, method, outputs)?;
                match prediction {
                    Prediction::Synergy => perturbation.add_synergy(),
                    Prediction::NonSynergy => perturbation.add_non_synergy(),
                    Prediction::NotAvailable => (),
                }
                self.predictions.insert(&perturbation.name(), prediction);
            }
        }
        Ok(())
    }

    /// **(internal)** Decide if the combination of the perturbation model at `index` is
    /// synergistic in this model.
    fn check_for_synergy(
        &self,
        index: usize,
        method: SynergyMethod,
        outputs: &ModelOutputs,
    ) -> Result<Prediction> {
        let combination_model = &self.perturbation_models[index];
        let combination = combination_model.perturbation().combination();
        let mut subset_models = Vec::new();
        for subset in combination.subsets() {
            let subset_model = self
                .find_perturbation_model(&subset)
                .filter(|it| it.response() != Response::NotSimulated)
                .ok_or_else(|| {
                    DrugSynergyError::config(format!(
                        "The subset `{}` of `{}` is not simulated before the combination",
                        subset, combination
                    ))
                })?;
            subset_models.push(subset_model);
        }

        let Some(response) = combination_model.global_output() else {
            tracing::debug!("{} cannot be evaluated for synergy (lacking attractors)", combination);
            return Ok(Prediction::NotAvailable);
        };
        let Some(subset_responses) = subset_models
            .iter()
            .map(|it| it.global_output())
            .collect::<Option<Vec<f64>>>()
        else {
            tracing::debug!("{} cannot be evaluated for synergy (lacking attractors)", combination);
            return Ok(Prediction::NotAvailable);
        };

        let is_synergy = match method {
            SynergyMethod::Hsa => {
                let minimum = subset_responses.iter().cloned().fold(f64::INFINITY, f64::min);
                response < minimum
            }
            SynergyMethod::Bliss => {
                let expected: f64 = subset_responses
                    .iter()
                    .map(|it| outputs.normalize(*it))
                    .product();
                outputs.normalize(response) < expected
            }
        };
        if is_synergy {
            tracing::debug!("{} is synergistic ({})", combination, method);
            Ok(Prediction::Synergy)
        } else {
            tracing::debug!("{} is NOT synergistic ({})", combination, method);
            Ok(Prediction::NonSynergy)
        }
    }

    /// **(internal)** Find the perturbation model with the same combination hash as
    /// `combination`.
    fn find_perturbation_model(
        &self,
        combination: &DrugCombination,
    ) -> Option<&PerturbationModel<'a>> {
        let hash = combination.combination_hash();
        self.perturbation_models
            .iter()
            .find(|it| it.perturbation().hash() == hash)
    }
}
