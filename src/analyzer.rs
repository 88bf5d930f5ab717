//! Simulation of the whole model ensemble.
//!
//! Every model is analysed by its own `ResponseModel`, either one after another, or on
//! a bounded `rayon` thread pool. The models only share the perturbations of the panel,
//! which accumulate the responses and synergy verdicts of all models. Statistics are computed
//! once every model is finished.

use crate::attractors::AttractorSolver;
use crate::error::{DrugSynergyError, Result};
use crate::outputs::ModelOutputs;
use crate::perturbations::{ModelPredictions, PerturbationPanel, ResponseModel, SynergyMethod};
use crate::BooleanModel;
use fxhash::FxHashSet;
use rayon::prelude::*;
use std::path::Path;

/// Runs the perturbations of a `PerturbationPanel` on every model of an ensemble.
pub struct DrugResponseAnalyzer<'a> {
    panel: &'a PerturbationPanel,
    outputs: &'a ModelOutputs,
    solver: &'a dyn AttractorSolver,
    method: SynergyMethod,
    parallel_simulations: Option<usize>,
}

/// Result of `DrugResponseAnalyzer::analyze`. The responses and synergy counts are
/// stored in the perturbations of the panel.
#[derive(Clone, Debug)]
pub struct AnalysisResult {
    /// Synergy verdicts of every model, in the order of the models.
    pub model_predictions: Vec<ModelPredictions>,
    pub models_simulated: usize,
}

impl<'a> DrugResponseAnalyzer<'a> {
    /// Create a serial analyzer.
    pub fn new(
        panel: &'a PerturbationPanel,
        outputs: &'a ModelOutputs,
        solver: &'a dyn AttractorSolver,
        method: SynergyMethod,
    ) -> DrugResponseAnalyzer<'a> {
        DrugResponseAnalyzer {
            panel,
            outputs,
            solver,
            method,
            parallel_simulations: None,
        }
    }

    /// Simulate models in parallel, using at most `threads` worker threads.
    pub fn with_parallel_simulations(mut self, threads: usize) -> DrugResponseAnalyzer<'a> {
        self.parallel_simulations = Some(threads.max(1));
        self
    }

    /// Simulate all `models` and compute the ensemble statistics of every perturbation.
    ///
    /// Every model gets its own subdirectory of `scratch` for temporary files, so model
    /// names must be unique. The first error of any model aborts the analysis.
    pub fn analyze(&self, models: &[BooleanModel], scratch: &Path) -> Result<AnalysisResult> {
        if models.is_empty() {
            return Err(DrugSynergyError::config("There are no models to analyze"));
        }
        let mut names = FxHashSet::default();
        for model in models {
            if !names.insert(model.name()) {
                return Err(DrugSynergyError::config(format!(
                    "Model name `{}` is used by more than one model",
                    model.name()
                )));
            }
        }

        let model_predictions = match self.parallel_simulations {
            None => {
                tracing::info!("Simulating {} models serially.", models.len());
                models
                    .iter()
                    .map(|model| self.simulate_model(model, scratch))
                    .collect::<Result<Vec<ModelPredictions>>>()?
            }
            Some(threads) => {
                tracing::info!(
                    "Simulating {} models in parallel using {} threads.",
                    models.len(),
                    threads
                );
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| {
                        DrugSynergyError::config(format!("Cannot create thread pool: {}", e))
                    })?;
                pool.install(|| {
                    models
                        .par_iter()
                        .map(|model| self.simulate_model(model, scratch))
                        .collect::<Result<Vec<ModelPredictions>>>()
                })?
            }
        };

        for perturbation in self.panel.perturbations() {
            perturbation.calculate_statistics();
        }

        let models_simulated = models.len();
        self.check_integrity(models_simulated)?;

        Ok(AnalysisResult {
            model_predictions,
            models_simulated,
        })
    }

    /// **(internal)** Run one `ResponseModel` inside its own logging span.
    fn simulate_model(&self, model: &BooleanModel, scratch: &Path) -> Result<ModelPredictions> {
        let span = tracing::info_span!("model", name = model.name());
        let _enter = span.enter();

        let model_scratch = scratch.join(model.name());
        std::fs::create_dir_all(&model_scratch)?;

        let mut response_model = ResponseModel::new(model, self.panel);
        response_model.simulate_responses(
            self.solver,
            self.outputs,
            self.method,
            &model_scratch,
        )?;
        tracing::info!("Model `{}` simulated.", model.name());
        Ok(response_model.into_predictions())
    }

    /// **(internal)** Every model gives at most one verdict about every perturbation.
    fn check_integrity(&self, models_simulated: usize) -> Result<()> {
        for perturbation in self.panel.perturbations() {
            let verdicts = perturbation.synergies() + perturbation.non_synergies();
            if verdicts > models_simulated {
                return Err(DrugSynergyError::Integrity(format!(
                    "Perturbation `{}` has {} synergy verdicts, but only {} models were simulated",
                    perturbation.name(),
                    verdicts,
                    models_simulated
                )));
            }
        }
        Ok(())
    }
}
