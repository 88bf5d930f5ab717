//! Run configuration.
//!
//! A configuration is read either from a `.toml` file:
//!
//! ```toml
//! max_drug_comb_size = 2
//! synergy_method = "bliss"
//! use_parallel_sim = true
//! parallel_sim_num = 4
//! attractor_tool = "external"
//!
//! [external_solver]
//! program = "bnet-attractors"
//! args = ["--fixed-points"]
//! ```
//!
//! or from the legacy tab separated format, where every line is `name:<TAB>value`. Missing
//! parameters have default values, unknown parameters are ignored with a warning.

use crate::attractors::{AttractorSolver, ExternalSolver, FixedPointSolver};
use crate::error::{DrugSynergyError, Result};
use crate::perturbations::SynergyMethod;
use crate::content_lines;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// Which `AttractorSolver` is used for the perturbed models.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AttractorTool {
    /// Symbolic stable states, see `FixedPointSolver`.
    #[default]
    FixedPoints,
    /// A user supplied program, see `ExternalSolver`.
    External,
}

/// The command used by `AttractorTool::External`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ExternalSolverConfig {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Amount of logged output, from 0 (errors only) to 3 (everything).
    pub verbosity: u8,
    pub delete_tmp_files: bool,
    pub use_parallel_sim: bool,
    /// Number of worker threads when `use_parallel_sim` is set.
    pub parallel_sim_num: usize,
    /// Largest drug combination enumerated when no perturbation file is given.
    pub max_drug_comb_size: usize,
    pub synergy_method: SynergyMethod,
    pub attractor_tool: AttractorTool,
    pub external_solver: ExternalSolverConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            verbosity: 3,
            delete_tmp_files: false,
            use_parallel_sim: true,
            parallel_sim_num: 4,
            max_drug_comb_size: 2,
            synergy_method: SynergyMethod::Hsa,
            attractor_tool: AttractorTool::FixedPoints,
            external_solver: ExternalSolverConfig::default(),
        }
    }
}

impl Config {
    /// Read a configuration file. Files with the `.toml` extension are parsed as TOML,
    /// everything else uses the legacy tab separated format.
    pub fn try_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        tracing::info!("Reading config file: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|it| it == "toml") {
            Config::try_from_toml(&content)
        } else {
            Config::try_from_tab(&content)
        }
    }

    pub fn try_from_toml(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the legacy `name:<TAB>value` format.
    pub fn try_from_tab(content: &str) -> Result<Config> {
        let mut config = Config::default();
        for line in content_lines(content) {
            let fields: Vec<&str> = line.split('\t').map(|it| it.trim()).collect();
            if fields.len() != 2 {
                tracing::warn!("Incorrect line found in config file: `{}`", line);
                continue;
            }
            let name = fields[0].trim_end_matches(':');
            let value = fields[1];
            match name {
                "verbosity" => config.verbosity = parse_value(name, value)?,
                "delete_tmp_files" => config.delete_tmp_files = parse_value(name, value)?,
                "use_parallel_sim" => config.use_parallel_sim = parse_value(name, value)?,
                "parallel_sim_num" => config.parallel_sim_num = parse_value(name, value)?,
                "max_drug_comb_size" => config.max_drug_comb_size = parse_value(name, value)?,
                "synergy_method" => config.synergy_method = SynergyMethod::from_str(value)?,
                "attractor_tool" => config.attractor_tool = legacy_attractor_tool(value),
                "compress_log_and_tmp_files" => {
                    if parse_value::<bool>(name, value)? {
                        tracing::warn!(
                            "Archiving of logs and temporary files is not supported, `{}` is ignored.",
                            name
                        );
                    }
                }
                "external_solver" => {
                    let mut command = value.split_whitespace().map(|it| it.to_string());
                    config.external_solver.program = command.next().unwrap_or_default();
                    config.external_solver.args = command.collect();
                }
                _ => tracing::warn!("Unknown config parameter `{}` is ignored.", name),
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Check the values of parameters that cannot be enforced by their type.
    pub fn validate(&self) -> Result<()> {
        if self.parallel_sim_num == 0 {
            return Err(DrugSynergyError::config(
                "Parameter `parallel_sim_num` must be at least 1",
            ));
        }
        if self.verbosity > 3 {
            return Err(DrugSynergyError::config(format!(
                "Parameter `verbosity` must be between 0 and 3, but is {}",
                self.verbosity
            )));
        }
        if self.attractor_tool == AttractorTool::External
            && self.external_solver.program.trim().is_empty()
        {
            return Err(DrugSynergyError::config(
                "Attractor tool `external` requires an external solver program",
            ));
        }
        Ok(())
    }

    /// Number of simulation threads, or `None` for a serial analysis.
    pub fn parallel_simulations(&self) -> Option<usize> {
        if self.use_parallel_sim {
            Some(self.parallel_sim_num)
        } else {
            None
        }
    }

    /// Default `tracing` filter directive for the configured verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            _ => "debug",
        }
    }

    pub fn build_solver(&self) -> Box<dyn AttractorSolver> {
        match self.attractor_tool {
            AttractorTool::FixedPoints => Box::new(FixedPointSolver::new()),
            AttractorTool::External => Box::new(ExternalSolver::new(
                &self.external_solver.program,
                self.external_solver.args.clone(),
            )),
        }
    }

    /// The configuration in the legacy tab separated format.
    pub fn to_tab(&self) -> String {
        let attractor_tool = match self.attractor_tool {
            AttractorTool::FixedPoints => "fixed_points",
            AttractorTool::External => "external",
        };
        let mut lines = vec![
            "# Drabme config file".to_string(),
            "# Each line is a parameter name and value".to_string(),
            "#".to_string(),
            "# Parameter:\tValue".to_string(),
            "#".to_string(),
            format!("verbosity:\t{}", self.verbosity),
            format!("delete_tmp_files:\t{}", self.delete_tmp_files),
            format!("use_parallel_sim:\t{}", self.use_parallel_sim),
            format!("parallel_sim_num:\t{}", self.parallel_sim_num),
            format!("max_drug_comb_size:\t{}", self.max_drug_comb_size),
            format!("synergy_method:\t{}", self.synergy_method),
            format!("attractor_tool:\t{}", attractor_tool),
        ];
        if !self.external_solver.program.is_empty() {
            let mut command = vec![self.external_solver.program.clone()];
            command.extend(self.external_solver.args.iter().cloned());
            lines.push(format!("external_solver:\t{}", command.join(" ")));
        }
        let mut result = lines.join("\n");
        result.push('\n');
        result
    }

    /// Write the default configuration in the legacy format.
    pub fn write_template<P: AsRef<Path>>(path: P) -> Result<()> {
        std::fs::write(path, Config::default().to_tab())?;
        Ok(())
    }
}

/// **(internal)** Parse one value of the legacy format.
fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        DrugSynergyError::config(format!(
            "Invalid value `{}` of config parameter `{}`",
            value, name
        ))
    })
}

/// **(internal)** Legacy files name the stable state tools explicitly. Every other tool
/// has to be provided as an external solver.
fn legacy_attractor_tool(value: &str) -> AttractorTool {
    match value {
        "fixed_points" | "biolqm_stable_states" => AttractorTool::FixedPoints,
        "external" => AttractorTool::External,
        _ => {
            tracing::warn!(
                "Attractor tool `{}` is not built in, an external solver is used.",
                value
            );
            AttractorTool::External
        }
    }
}
