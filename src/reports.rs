//! Tab separated result tables of an analysis.
//!
//! Every table starts with a header line. Perturbations appear in panel order; the synergy
//! tables only list combinations of two or more drugs.

use crate::analyzer::AnalysisResult;
use crate::error::Result;
use crate::outputs::ModelOutputs;
use crate::perturbations::{ModelPredictions, PerturbationPanel, SynergyMethod};
use std::path::{Path, PathBuf};

/// Mean, standard deviation and all predicted responses of every perturbation.
pub fn modelwise_responses(panel: &PerturbationPanel) -> String {
    let mut table = String::from("Perturbation\tAverage\tSD\tData\n");
    for perturbation in panel.perturbations() {
        table.push_str(&format!(
            "{}\t{}\t{}",
            perturbation.name(),
            perturbation.mean(),
            perturbation.sd()
        ));
        for response in perturbation.predictions() {
            table.push_str(&format!("\t{}", response));
        }
        table.push('\n');
    }
    table
}

/// Number of models that predict a synergy (or no synergy) for every combination.
pub fn modelwise_synergies(panel: &PerturbationPanel) -> String {
    let mut table = String::from("Perturbation\tSynergies\tNon-synergies\n");
    for perturbation in panel.perturbations().iter().filter(|it| it.size() >= 2) {
        table.push_str(&format!(
            "{}\t{}\t{}\n",
            perturbation.name(),
            perturbation.synergies(),
            perturbation.non_synergies()
        ));
    }
    table
}

pub fn ensemblewise_responses(panel: &PerturbationPanel) -> String {
    let mut table = String::from("Perturbation\tEnsemble average response\n");
    for perturbation in panel.perturbations() {
        table.push_str(&format!("{}\t{}\n", perturbation.name(), perturbation.mean()));
    }
    table
}

/// Response excess of every combination over its subsets,
/// see `PerturbationPanel::response_excess`.
pub fn ensemblewise_synergies(
    panel: &PerturbationPanel,
    method: SynergyMethod,
    outputs: &ModelOutputs,
) -> Result<String> {
    let mut table = String::from("Perturbation\tResponse excess over subset\n");
    for perturbation in panel.perturbations().iter().filter(|it| it.size() >= 2) {
        let excess = panel.response_excess(perturbation, method, outputs)?;
        table.push_str(&format!("{}\t{}\n", perturbation.name(), excess));
    }
    Ok(table)
}

/// One row of synergy verdicts (`1`, `0` or `NA`) per model.
pub fn model_predictions(panel: &PerturbationPanel, predictions: &[ModelPredictions]) -> String {
    let combinations = panel.combination_names(2);
    let mut table = String::from("ModelName");
    for combination in &combinations {
        table.push('\t');
        table.push_str(combination);
    }
    table.push('\n');
    for model in predictions {
        table.push_str(&model.to_row(&combinations));
        table.push('\n');
    }
    table
}

/// Write all five tables into `directory` as `<project>_<table>.tab` and return the paths of
/// the written files.
pub fn write_reports(
    directory: &Path,
    project: &str,
    panel: &PerturbationPanel,
    result: &AnalysisResult,
    method: SynergyMethod,
    outputs: &ModelOutputs,
) -> Result<Vec<PathBuf>> {
    let tables = vec![
        ("modelwise_responses", modelwise_responses(panel)),
        ("modelwise_synergies", modelwise_synergies(panel)),
        ("ensemblewise_responses", ensemblewise_responses(panel)),
        (
            "ensemblewise_synergies",
            ensemblewise_synergies(panel, method, outputs)?,
        ),
        (
            "model_predictions",
            model_predictions(panel, &result.model_predictions),
        ),
    ];
    let mut written = Vec::new();
    for (table, content) in tables {
        let path = directory.join(format!("{}_{}.tab", project, table));
        std::fs::write(&path, content)?;
        tracing::info!("Written {}.", path.display());
        written.push(path);
    }
    Ok(written)
}
