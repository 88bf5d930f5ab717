use crate::_expression_parser::ExpressionTemp;
use crate::BooleanModel;
use std::convert::TryFrom;

impl BooleanModel {
    /// Try to load a Boolean model from a `.bnet` model string.
    ///
    /// Variables are ordered by their declaration. Variables which are only used as regulators
    /// follow after the declared ones and keep their value (identity update function).
    ///
    /// The returned model has an empty name, see `BooleanModel::try_from_file`.
    pub fn try_from_bnet(model_string: &str) -> Result<BooleanModel, String> {
        let mut declarations: Vec<(String, ExpressionTemp)> = Vec::new();
        let mut variables: Vec<String> = Vec::new();
        for line in model_string.lines() {
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() || line.starts_with("targets,") {
                continue; // Skip comments, empty lines and header.
            }
            let segments = line.split(',').collect::<Vec<_>>();
            if segments.len() != 2 {
                return Err(format!("Unexpected line: `{}`", line));
            }

            let variable_name = segments[0].trim().to_string();
            if declarations.iter().any(|(name, _)| *name == variable_name) {
                return Err(format!(
                    "Duplicate function declaration for `{}`.",
                    variable_name
                ));
            }
            let function = ExpressionTemp::try_from(segments[1].trim())?;
            declarations.push((variable_name, function));
        }

        for (name, _) in &declarations {
            variables.push(name.clone());
        }
        for (_, function) in &declarations {
            function.dump_variables(&mut variables);
        }

        let mut model = BooleanModel::new("", variables)?;
        for (name, function) in declarations {
            let id = model
                .find_variable(&name)
                .ok_or_else(|| format!("Unknown variable `{}`.", name))?;
            let function = function.into_fn_update(&model)?;
            model.set_update_function(id, function)?;
        }

        Ok(model)
    }
}
