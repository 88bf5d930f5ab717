use crate::attractors::{check_attractor, AttractorSolver, ExternalSolver};
use crate::error::{DrugSynergyError, Result};
use crate::BooleanModel;
use std::path::Path;
use std::process::Command;

impl ExternalSolver {
    /// Create a solver that runs `program` with the given `args`. The path of the model
    /// file is always appended as the last argument.
    pub fn new(program: &str, args: Vec<String>) -> ExternalSolver {
        ExternalSolver {
            program: program.to_string(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        self.program.as_str()
    }

    /// Parse the standard output of the external tool. Every non-empty line that does not
    /// start with `#` is an attractor.
    pub fn parse_output(
        output: &str,
        model: &BooleanModel,
    ) -> std::result::Result<Vec<String>, String> {
        let mut attractors = Vec::new();
        for line in output.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            check_attractor(line, model.num_vars())?;
            attractors.push(line.to_string());
        }
        Ok(attractors)
    }
}

impl AttractorSolver for ExternalSolver {
    fn attractors(&self, model: &BooleanModel, scratch: &Path) -> Result<Vec<String>> {
        let model_file = scratch.join(format!("{}.bnet", model.name()));
        let bnet = model.to_bnet(true).map_err(DrugSynergyError::Model)?;
        std::fs::write(&model_file, bnet)?;

        tracing::trace!(
            program = %self.program,
            model = %model_file.display(),
            "Running external attractor tool."
        );
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&model_file)
            .current_dir(scratch)
            .output()
            .map_err(|e| {
                DrugSynergyError::Solver(format!("Cannot run `{}`: {}", self.program, e))
            })?;

        if !output.status.success() {
            return Err(DrugSynergyError::Solver(format!(
                "`{}` failed for model `{}` ({}): {}",
                self.program,
                model.name(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_output(&stdout, model).map_err(|e| {
            DrugSynergyError::Solver(format!(
                "Invalid output of `{}` for model `{}`: {}",
                self.program,
                model.name(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::attractors::{AttractorSolver, ExternalSolver};
    use crate::error::DrugSynergyError;
    use crate::BooleanModel;
    use pretty_assertions::assert_eq;

    fn model() -> BooleanModel {
        let mut model = BooleanModel::try_from_bnet("A, !B\nB, !A").unwrap();
        model.set_name("toggle");
        model
    }

    #[test]
    fn parse_solver_output() {
        let model = model();
        let output = "# stable states\n01\n\n10\n";
        assert_eq!(
            vec!["01".to_string(), "10".to_string()],
            ExternalSolver::parse_output(output, &model).unwrap()
        );
        assert!(ExternalSolver::parse_output("A B\n01", &model).is_err());
        assert!(ExternalSolver::parse_output("011", &model).is_err());
        assert!(ExternalSolver::parse_output("", &model).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn run_external_tool() {
        let scratch = tempfile::tempdir().unwrap();
        let model = model();

        // The model file is the last argument (`$0` of the script).
        let solver = ExternalSolver::new(
            "sh",
            vec![
                "-c".to_string(),
                "test -f \"$0\" && printf '01\\n1-\\n'".to_string(),
            ],
        );
        let attractors = solver.attractors(&model, scratch.path()).unwrap();
        assert_eq!(vec!["01".to_string(), "1-".to_string()], attractors);
        assert!(scratch.path().join("toggle.bnet").exists());

        let failing = ExternalSolver::new("sh", vec!["-c".to_string(), "exit 3".to_string()]);
        let error = failing.attractors(&model, scratch.path()).unwrap_err();
        assert!(matches!(error, DrugSynergyError::Solver(_)));

        let missing = ExternalSolver::new("this-program-does-not-exist", Vec::new());
        assert!(missing.attractors(&model, scratch.path()).is_err());
    }
}
