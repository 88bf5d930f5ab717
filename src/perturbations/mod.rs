//! Perturbations (drug combinations applied to the models) and synergy scoring.
//!
//! A `PerturbationPanel` owns one `Perturbation` per drug combination of the analysis.
//! Perturbations are shared by all simulation threads: every model adds its predicted
//! response (global output) and its synergy verdict into them.
//!
//! For every model, a `ResponseModel` builds one `PerturbationModel` per perturbation,
//! computes its global output and classifies every combination of two or more drugs
//! as synergistic or not (see `SynergyMethod`). The verdicts of one model are collected
//! into `ModelPredictions`.

use crate::drugs::DrugCombination;
use crate::BooleanModel;
use fxhash::FxHashMap;
use serde::Deserialize;
use std::sync::atomic::AtomicUsize;
use std::sync::Mutex;

/// **(internal)** Shared accumulator of one drug combination.
mod _impl_perturbation;
/// **(internal)** Construction, lookup and ensemble synergy of `PerturbationPanel`.
mod _impl_perturbation_panel;
/// **(internal)** Perturbed models and their global output.
mod _impl_perturbation_model;
/// **(internal)** Per-model synergy classification.
mod _impl_response_model;
/// **(internal)** Per-model prediction records.
mod _impl_model_predictions;
/// **(internal)** Parsing and display of `SynergyMethod`.
mod _impl_synergy_method;

/// The rule used to decide whether a drug combination is synergistic.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SynergyMethod {
    /// Highest single agent: a combination is synergistic when its response is lower than
    /// the response of every subset.
    #[default]
    Hsa,
    /// Bliss independence: a combination is synergistic when its normalized response is lower
    /// than the product of the normalized responses of its subsets.
    Bliss,
}

/// Statistics of the responses predicted for one perturbation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResponseStatistics {
    pub mean: f64,
    /// Sample standard deviation (`n - 1` denominator).
    pub sd: f64,
}

/// One drug combination together with everything predicted about it by the models
/// of the ensemble.
///
/// The responses and synergy counters are written concurrently by all simulation threads.
/// Statistics are cached and recomputed after a new response is added.
#[derive(Debug)]
pub struct Perturbation {
    combination: DrugCombination,
    hash: i32,
    predicted_responses: Mutex<Vec<f64>>,
    synergies: AtomicUsize,
    non_synergies: AtomicUsize,
    statistics: Mutex<Option<ResponseStatistics>>,
}

/// All perturbations of one analysis, in the order of their combinations.
///
/// Combination hashes of all perturbations are pairwise distinct.
#[derive(Debug)]
pub struct PerturbationPanel {
    perturbations: Vec<Perturbation>,
}

/// The response of one model to one perturbation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Response {
    /// Attractors were not computed yet.
    #[default]
    NotSimulated,
    /// The perturbed model has no attractors, so there is no global output.
    NotAvailable,
    /// The raw global output of the perturbed model.
    Known(f64),
}

/// A model with the targets of one perturbation fixed to the effect of their drug.
///
/// The base model is not copied. The fixed nodes are applied when the model is
/// materialized for the attractor solver.
#[derive(Clone, Debug)]
pub struct PerturbationModel<'a> {
    base: &'a BooleanModel,
    perturbation: &'a Perturbation,
    name: String,
    fixed: Vec<(String, bool)>,
    attractors: Vec<String>,
    response: Response,
}

/// Per-model synergy classification of all perturbations in a panel.
pub struct ResponseModel<'a> {
    model: &'a BooleanModel,
    perturbation_models: Vec<PerturbationModel<'a>>,
    predictions: ModelPredictions,
}

/// A synergy verdict of one model about one drug combination.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Prediction {
    Synergy,
    NonSynergy,
    /// The combination, or one of its subsets, has no global output in this model.
    NotAvailable,
}

/// Synergy verdicts of one model, indexed by combination name.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ModelPredictions {
    model_name: String,
    predictions: FxHashMap<String, Prediction>,
}
