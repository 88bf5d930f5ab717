//! Predict drug combination synergies on an ensemble of Boolean models.
//!
//! Usage:
//!   drabme --project toy --models-dir models/ --drugs drugpanel.tab \
//!     --model-outputs modeloutputs.tab --config config.tab --output-dir results/
//!
//! Without `--perturbations`, all drug combinations up to `max_drug_comb_size` are analysed.
//! Use `--write-templates <DIR>` to create example input files.

use anyhow::{anyhow, Context, Result};
use biodivine_drug_synergy::analyzer::DrugResponseAnalyzer;
use biodivine_drug_synergy::config::Config;
use biodivine_drug_synergy::drugs::DrugPanel;
use biodivine_drug_synergy::outputs::ModelOutputs;
use biodivine_drug_synergy::perturbations::PerturbationPanel;
use biodivine_drug_synergy::reports::write_reports;
use biodivine_drug_synergy::BooleanModel;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "drabme")]
#[command(about = "Drug response analysis of Boolean model ensembles")]
struct Args {
    /// Name of the project, used as a prefix of all result files
    #[arg(long, required_unless_present = "write_templates")]
    project: Option<String>,

    /// Directory with the models of the ensemble (`.bnet` or `.gitsbe` files)
    #[arg(long, required_unless_present = "write_templates")]
    models_dir: Option<PathBuf>,

    /// Drug panel file
    #[arg(long, required_unless_present = "write_templates")]
    drugs: Option<PathBuf>,

    /// Drug combinations to analyse (default: all combinations up to `max_drug_comb_size`)
    #[arg(long)]
    perturbations: Option<PathBuf>,

    /// Configuration file (`.toml` or the tab separated format)
    #[arg(long, env = "DRABME_CONFIG")]
    config: Option<PathBuf>,

    /// Weighted output nodes of the models
    #[arg(long, required_unless_present = "write_templates")]
    model_outputs: Option<PathBuf>,

    /// Directory for the results (created if necessary)
    #[arg(long, required_unless_present = "write_templates")]
    output_dir: Option<PathBuf>,

    /// Write template input files into the given directory and exit
    #[arg(long, exclusive = true)]
    write_templates: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(directory) = &args.write_templates {
        return write_templates(directory);
    }

    // The verbosity is only known once the config is read, so the config is loaded
    // under a temporary subscriber.
    let loading = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    let config =
        tracing::subscriber::with_default(loading, || load_config(args.config.as_deref()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level())),
        )
        .init();

    run(&args, &config)
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let start = Instant::now();
    let project = required(&args.project, "--project")?;
    let output_dir = required(&args.output_dir, "--output-dir")?;
    tracing::info!("Drabme {} (project `{}`)", env!("CARGO_PKG_VERSION"), project);
    tracing::debug!(?config, "Configuration.");

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Cannot create output directory {}", output_dir.display()))?;
    let scratch = output_dir.join("drabme_tmp");
    std::fs::create_dir_all(&scratch)
        .with_context(|| format!("Cannot create directory {}", scratch.display()))?;

    let models_dir = required(&args.models_dir, "--models-dir")?;
    let models = BooleanModel::load_ensemble(models_dir)
        .map_err(|e| anyhow!(e))
        .with_context(|| format!("Cannot load models from {}", models_dir.display()))?;
    tracing::info!("Loaded {} models.", models.len());

    let drugs_file = required(&args.drugs, "--drugs")?;
    let drug_panel = DrugPanel::try_from_file(drugs_file)
        .with_context(|| format!("Cannot load drug panel {}", drugs_file.display()))?;
    for model in &models {
        drug_panel.check_drug_targets(model);
    }

    let combinations = match &args.perturbations {
        Some(path) => drug_panel
            .load_combinations(path)
            .with_context(|| format!("Cannot load perturbations {}", path.display()))?,
        None => {
            if config.max_drug_comb_size == 0 {
                tracing::warn!("Parameter `max_drug_comb_size` is 0, no perturbations are analysed.");
            }
            drug_panel.enumerate(config.max_drug_comb_size)
        }
    };
    let panel = PerturbationPanel::new(combinations)?;
    tracing::info!(
        "Perturbation panel with {} single drugs and {} combinations.",
        panel.len_of_size(1),
        panel.len() - panel.len_of_size(1)
    );

    let outputs_file = required(&args.model_outputs, "--model-outputs")?;
    let outputs = ModelOutputs::try_from_file(outputs_file)
        .with_context(|| format!("Cannot load model outputs {}", outputs_file.display()))?;
    for model in &models {
        outputs.check_output_nodes(model);
    }

    let solver = config.build_solver();
    let mut analyzer =
        DrugResponseAnalyzer::new(&panel, &outputs, solver.as_ref(), config.synergy_method);
    if let Some(threads) = config.parallel_simulations() {
        analyzer = analyzer.with_parallel_simulations(threads);
    }
    let result = analyzer.analyze(&models, &scratch)?;

    write_reports(
        output_dir,
        project,
        &panel,
        &result,
        config.synergy_method,
        &outputs,
    )?;

    if config.delete_tmp_files {
        std::fs::remove_dir_all(&scratch)
            .with_context(|| format!("Cannot delete directory {}", scratch.display()))?;
    }

    tracing::info!(
        "Analysis of {} models finished in {:.2}s.",
        result.models_simulated,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::try_from_file(path)
            .with_context(|| format!("Cannot load config file {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn required<'a, T>(value: &'a Option<T>, name: &str) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| anyhow!("Missing argument {}", name))
}

fn write_templates(directory: &Path) -> Result<()> {
    std::fs::create_dir_all(directory)?;
    DrugPanel::write_template(directory.join("drugpanel.tab"))?;
    ModelOutputs::write_template(directory.join("modeloutputs.tab"))?;
    Config::write_template(directory.join("config.tab"))?;
    println!("Templates written into {}.", directory.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::load_config;
    use biodivine_drug_synergy::config::Config;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_is_loaded_under_temporary_subscriber() {
        assert_eq!(Config::default(), load_config(None).unwrap());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.tab");
        std::fs::write(&path, "verbosity:\t1\nnot_a_parameter:\t5\n").unwrap();
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        let config =
            tracing::subscriber::with_default(subscriber, || load_config(Some(&path))).unwrap();
        assert_eq!("warn", config.log_level());

        let missing = dir.path().join("missing.tab");
        let error = load_config(Some(&missing)).unwrap_err();
        assert!(error.to_string().contains("Cannot load config file"));
    }
}
