use crate::{BooleanModel, FnUpdate, VariableId, VariableIdIterator};
use fxhash::{FxHashMap, FxHashSet};
use std::ops::Index;
use std::path::Path;

/// Basic methods for safely building `BooleanModel`s.
impl BooleanModel {
    /// Construct a new `BooleanModel` with the given variables. Initially, every variable
    /// uses the identity update function (i.e. it is an input which keeps its value).
    ///
    /// Variable names must be unique and non-empty.
    pub fn new(name: &str, variables: Vec<String>) -> Result<BooleanModel, String> {
        let mut variable_to_index = FxHashMap::default();
        for (i, variable) in variables.iter().enumerate() {
            if variable.is_empty() {
                return Err("Variable name cannot be empty.".to_string());
            }
            if variable_to_index
                .insert(variable.clone(), VariableId(i))
                .is_some()
            {
                return Err(format!("Variable `{}` declared twice.", variable));
            }
        }
        let update_functions = (0..variables.len())
            .map(|i| FnUpdate::Var(VariableId(i)))
            .collect();
        Ok(BooleanModel {
            name: name.to_string(),
            variables,
            update_functions,
            variable_to_index,
        })
    }

    /// Load a `BooleanModel` from a file. The format is inferred from the file extension:
    /// `.bnet` is read as a BoolNet model, `.gitsbe`, `.booleannet` and `.txt` are read
    /// as BooleanNet equations.
    ///
    /// If the file does not declare a model name, the file stem is used.
    pub fn try_from_file<T: AsRef<Path>>(path: T) -> Result<BooleanModel, String> {
        let path: &Path = path.as_ref();
        let extension = path.extension().and_then(|it| it.to_str());
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("File `{}` not readable: {}", path.display(), e))?;
        let mut model = match extension {
            Some("bnet") => Self::try_from_bnet(content.as_str())?,
            Some("gitsbe") | Some("booleannet") | Some("txt") => {
                Self::try_from_booleannet(content.as_str())?
            }
            _ => return Err(format!("Unknown model format: `{}`.", path.display())),
        };
        if model.name.is_empty() {
            let stem = path
                .file_stem()
                .and_then(|it| it.to_str())
                .unwrap_or("model");
            model.set_name(stem);
        }
        Ok(model)
    }

    /// Load all models (`.bnet` or `.gitsbe` files) from the given directory, ordered by
    /// file name.
    ///
    /// Returns an error if the directory contains no models.
    pub fn load_ensemble<T: AsRef<Path>>(directory: T) -> Result<Vec<BooleanModel>, String> {
        let directory = directory.as_ref();
        let entries = std::fs::read_dir(directory)
            .map_err(|e| format!("Directory `{}` not readable: {}", directory.display(), e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| e.to_string())?.path();
            let extension = path.extension().and_then(|it| it.to_str());
            if matches!(extension, Some("bnet") | Some("gitsbe")) {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(format!(
                "No models found in directory `{}`.",
                directory.display()
            ));
        }
        paths.sort();
        let models = paths
            .iter()
            .map(Self::try_from_file)
            .collect::<Result<Vec<_>, String>>()?;
        let mut names = FxHashSet::default();
        for model in &models {
            if !names.insert(model.name()) {
                return Err(format!(
                    "Model name `{}` is used by more than one model in `{}`.",
                    model.name(),
                    directory.display()
                ));
            }
        }
        Ok(models)
    }

    /// Replace the update function of the given variable.
    ///
    /// The function can only reference variables of this model.
    pub fn set_update_function(
        &mut self,
        variable: VariableId,
        function: FnUpdate,
    ) -> Result<(), String> {
        if variable.0 >= self.num_vars() {
            return Err(format!("Unknown variable {}.", variable));
        }
        if let Some(invalid) = function
            .collect_arguments()
            .into_iter()
            .find(|it| it.0 >= self.num_vars())
        {
            return Err(format!(
                "Update function of `{}` references unknown {}.",
                self.variables[variable.0], invalid
            ));
        }
        self.update_functions[variable.0] = function;
        Ok(())
    }

    /// Lock the variable with the given name to a constant `value`, i.e. replace its update
    /// function with `Const(value)`.
    ///
    /// Returns the `VariableId` of the fixed variable, or `None` when the model has no such
    /// variable (in which case the model is unchanged).
    pub fn fix_variable(&mut self, name: &str, value: bool) -> Option<VariableId> {
        let id = self.find_variable(name)?;
        self.update_functions[id.0] = FnUpdate::Const(value);
        Some(id)
    }

    /// Change the name of this model.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// Some basic utility methods for inspecting the `BooleanModel`.
impl BooleanModel {
    /// Name of this model.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The number of variables in this model.
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// Return an iterator over all variable ids of this model.
    pub fn variables(&self) -> VariableIdIterator {
        (0..self.variables.len()).map(VariableId)
    }

    /// Return the name of the given variable.
    pub fn get_variable_name(&self, id: VariableId) -> &String {
        &self.variables[id.0]
    }

    /// Names of all variables, in the order of their ids.
    pub fn variable_names(&self) -> &[String] {
        &self.variables
    }

    /// Find a `VariableId` corresponding to the given name.
    pub fn find_variable(&self, name: &str) -> Option<VariableId> {
        self.variable_to_index.get(name).cloned()
    }

    /// Get the current update function of the given variable.
    pub fn get_update_function(&self, id: VariableId) -> &FnUpdate {
        &self.update_functions[id.0]
    }

    /// Compute the successor of the given state under the synchronous update (all variables
    /// updated at once). A state is a stable state iff it is its own successor.
    pub fn successor(&self, state: &[bool]) -> Vec<bool> {
        self.update_functions
            .iter()
            .map(|function| function.evaluate(state))
            .collect()
    }
}

impl Index<VariableId> for BooleanModel {
    type Output = FnUpdate;

    fn index(&self, index: VariableId) -> &Self::Output {
        &self.update_functions[index.0]
    }
}
