//! Computation of model attractors.
//!
//! An attractor is represented as a string with one character per model variable (in the
//! order of `BooleanModel::variables`), where each character is `0`, `1`, or `-` for
//! a variable that is not fixed in the attractor.
//!
//! There are two solvers available:
//!
//!  1. `FixedPointSolver` computes all stable states of the model symbolically, using BDDs.
//!  The model is small enough for this in most applications, because drug targets are
//!  already fixed to constants.
//!
//!  2. `ExternalSolver` writes the model into a `.bnet` file and runs a configured external
//!  tool on it. The tool must print one attractor per line on its standard output.

use crate::error::Result;
use crate::BooleanModel;
use std::path::Path;

/// **(internal)** Symbolic stable state search.
mod _impl_fixed_point_solver;
/// **(internal)** Running external attractor tools.
mod _impl_external_solver;

/// Computes the attractors of a (perturbed) `BooleanModel`.
///
/// Solvers are shared by all simulation threads, hence the `Send + Sync` bound. Every call
/// receives a scratch directory that it can use for temporary files.
pub trait AttractorSolver: Send + Sync {
    /// Return all attractors of the `model`. An empty result is not an error, it means that
    /// the solver did not find any attractor.
    fn attractors(&self, model: &BooleanModel, scratch: &Path) -> Result<Vec<String>>;
}

/// Symbolic solver which computes all fixed points (stable states) of a model.
#[derive(Clone, Debug, Default)]
pub struct FixedPointSolver {
    _dummy: (),
}

/// Runs an external program to compute attractors.
///
/// The program is started in the scratch directory as `program args... <model>.bnet`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExternalSolver {
    program: String,
    args: Vec<String>,
}

/// **(internal)** Check that `attractor` is a valid attractor string for a model with
/// `num_vars` variables.
pub(crate) fn check_attractor(attractor: &str, num_vars: usize) -> std::result::Result<(), String> {
    if attractor.len() != num_vars {
        return Err(format!(
            "Attractor `{}` has length {}, but the model has {} variables.",
            attractor,
            attractor.len(),
            num_vars
        ));
    }
    if let Some(c) = attractor.chars().find(|c| !matches!(c, '0' | '1' | '-')) {
        return Err(format!("Unexpected '{}' in attractor `{}`.", c, attractor));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::check_attractor;

    #[test]
    fn attractor_format() {
        assert!(check_attractor("01-", 3).is_ok());
        assert!(check_attractor("", 0).is_ok());
        assert!(check_attractor("01", 3).is_err());
        assert!(check_attractor("01x", 3).is_err());
    }
}
